//! Named fixture storage and server construction.

use std::collections::HashMap;
use std::path::Path;

use crate::config::loader::{fixture_definitions, load_fixture_file, ConfigError};
use crate::config::ServerOptions;
use crate::fixture::definition::{Fixture, FixtureDefinition};
use crate::fixture::error::FixtureError;
use crate::http::FixtureServer;
use crate::lifecycle::{FixtureRun, TestLifecycle};

/// The fixture names a server should expose.
///
/// Built from nothing (`()` or `None`), a single name, or a list of names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureNames(Vec<String>);

impl FixtureNames {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<()> for FixtureNames {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<&str> for FixtureNames {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for FixtureNames {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&[&str]> for FixtureNames {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|name| name.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FixtureNames {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|name| name.to_string()).collect())
    }
}

impl From<Vec<&str>> for FixtureNames {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for FixtureNames {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl<T: Into<FixtureNames>> From<Option<T>> for FixtureNames {
    fn from(names: Option<T>) -> Self {
        names.map(Into::into).unwrap_or_default()
    }
}

/// Named fixtures plus the options every server built from them shares.
///
/// ```ignore
/// let mut registry = FixtureRegistry::new(ServerOptions::default().with_port(1337));
/// registry.add_fixture(
///     "GET 200 /hello",
///     FixtureDefinition::new()
///         .method("get")
///         .route("/hello")
///         .response(|_req: Request<Body>| async { "world" }),
/// )?;
/// let run = registry.run("GET 200 /hello")?;
/// run.start().await?;
/// // ... requests against http://127.0.0.1:1337/hello ...
/// run.stop().await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureRegistry {
    fixtures: HashMap<String, Fixture>,
    options: ServerOptions,
}

impl FixtureRegistry {
    pub fn new(options: ServerOptions) -> Self {
        Self {
            fixtures: HashMap::new(),
            options,
        }
    }

    /// Build a registry from a fixture file.
    ///
    /// `path` is resolved against the current working directory. When
    /// `options` is `None` the file's `[server]` table is used, falling back
    /// to defaults.
    pub fn from_source(path: impl AsRef<Path>, options: Option<ServerOptions>) -> Result<Self, ConfigError> {
        let full_path = std::env::current_dir()
            .map_err(ConfigError::CurrentDir)?
            .join(path.as_ref());

        let mut file = load_fixture_file(&full_path)?;
        let options = options.or_else(|| file.server.take()).unwrap_or_default();

        let mut registry = Self::new(options);
        registry.add_fixtures(fixture_definitions(file)?)?;

        tracing::info!(
            path = %full_path.display(),
            fixtures = registry.len(),
            "Fixtures loaded from file"
        );
        Ok(registry)
    }

    /// Validate and store a fixture, replacing any fixture with the same name.
    pub fn add_fixture(
        &mut self,
        name: impl Into<String>,
        definition: FixtureDefinition,
    ) -> Result<&mut Self, FixtureError> {
        let name = name.into();
        let fixture = Fixture::from_definition(&name, definition)?;

        tracing::debug!(
            fixture = %name,
            method = %fixture.method(),
            route = %fixture.route(),
            "Fixture registered"
        );

        if self.fixtures.insert(name, fixture).is_some() {
            tracing::debug!("Fixture replaced an earlier definition with the same name");
        }
        Ok(self)
    }

    /// [`add_fixture`](Self::add_fixture) for each entry, in iteration order.
    ///
    /// Stops at the first invalid definition; entries before it stay registered.
    pub fn add_fixtures<I, K>(&mut self, definitions: I) -> Result<&mut Self, FixtureError>
    where
        I: IntoIterator<Item = (K, FixtureDefinition)>,
        K: Into<String>,
    {
        for (name, definition) in definitions {
            if let Err(err) = self.add_fixture(name, definition).map(|_| ()) {
                tracing::warn!(
                    fixture = %err.fixture(),
                    registered = self.len(),
                    "Bulk registration stopped at an invalid fixture"
                );
                return Err(err);
            }
        }
        Ok(self)
    }

    /// Build a server exposing the named fixtures, in order.
    ///
    /// Every name is resolved before anything is installed, so an unknown
    /// name yields no server at all. The server is not listening yet.
    pub fn create_server(&self, names: impl Into<FixtureNames>) -> Result<FixtureServer, FixtureError> {
        let names = names.into();
        let fixtures = names
            .iter()
            .map(|name| {
                self.fixtures.get(name).ok_or_else(|| FixtureError::NotFound {
                    fixture: name.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut server = FixtureServer::new(self.options.clone());
        for fixture in fixtures {
            server.install_fixture(fixture);
        }
        Ok(server)
    }

    /// Build a server and hand back its `start`/`stop` callbacks.
    ///
    /// Meant to be called while a test group is being set up; the test
    /// harness decides when to start and stop.
    pub fn run(&self, names: impl Into<FixtureNames>) -> Result<FixtureRun, FixtureError> {
        self.create_server(names).map(FixtureRun::new)
    }

    /// [`run`](Self::run), registering `start` as a before-group hook and
    /// `stop` as an after-group hook.
    pub fn run_with<L>(&self, names: impl Into<FixtureNames>, lifecycle: &mut L) -> Result<FixtureRun, FixtureError>
    where
        L: TestLifecycle + ?Sized,
    {
        let run = self.run(names)?;
        run.register(lifecycle);
        Ok(run)
    }

    pub fn options(&self) -> &ServerOptions {
        &self.options
    }

    pub fn get(&self, name: &str) -> Option<&Fixture> {
        self.fixtures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fixtures.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.fixtures.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}
