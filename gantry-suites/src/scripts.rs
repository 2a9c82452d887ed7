//! Shell script building blocks
//!
//! Every stage step is an inline shell script handed verbatim to the
//! executor. The helpers here produce the shared pieces: the bash
//! re-exec header, the `docker run` shim functions that route CMS tools
//! through the per-runtime container image, and the docker-compose calls
//! that start and stop database sidecars.
//!
//! Two kinds of variables appear in generated scripts. `${name}`
//! placeholders are plan-time parameters filled in from the environment
//! binding before the plan leaves the generator. Bare `$NAME` references
//! are executor-runtime shell variables (`$HOST_UID`,
//! `$COMPOSE_PROJECT_NAME`, `$PWD`, ...) and survive untouched.

/// Bash header forking a bash if the executor started us under another shell
pub const BASH_HEADER: &str = "#!/bin/bash\n\nif [ \"$(ps -p \"$$\" -o comm=)\" != \"bash\" ]; then\n    bash \"$0\" \"$@\"\n    exit \"$?\"\nfi\n\nset -x\n\n";

/// Path to the testing framework's build configuration inside the checkout
pub const TESTING_FRAMEWORK_BUILD_PATH: &str = "vendor/cms/testing-framework/Build/";

/// Directory holding the sidecar compose definitions inside the checkout
pub const COMPOSE_PROJECT_PATH: &str = "Build/testing-docker";

/// COMPOSER_ROOT_VERSION exported to composer steps
pub const COMPOSER_ROOT_VERSION: &str = "9.4.0@dev";

/// Container image for a runtime tag, e.g. `PHP72` -> `phpci/php72:latest`
pub fn runtime_image(runtime: &str) -> String {
    format!("phpci/{}:latest", runtime.to_lowercase())
}

/// Builder for the docker-run shim functions embedded in stage scripts
///
/// A shim wraps one CMS tool in a bash function that runs it inside the
/// runtime container: it impersonates the build user, mounts the build
/// volume, optionally joins the per-build sidecar network, and forwards
/// `$@` to the wrapped command.
#[derive(Debug, Clone)]
pub struct ContainerShim {
    function_name: String,
    image: String,
    env_flags: Vec<String>,
    join_network: bool,
    export_home: bool,
    workdir: String,
    command: String,
}

impl ContainerShim {
    /// Create a shim for `function_name` against the runtime's image
    ///
    /// The default wrapped command is `./bin/{function_name} $*` in the
    /// checkout root; override it with [`ContainerShim::command`].
    pub fn new(function_name: impl Into<String>, runtime: &str) -> Self {
        let function_name = function_name.into();
        let command = format!("./bin/{} $*", function_name);
        Self {
            function_name,
            image: runtime_image(runtime),
            env_flags: Vec::new(),
            join_network: false,
            export_home: false,
            workdir: String::new(),
            command,
        }
    }

    /// Pass an environment flag, e.g. `CMS_DB_HOST=${host}`
    pub fn env(mut self, flag: impl Into<String>) -> Self {
        self.env_flags.push(flag.into());
        self
    }

    /// Join the per-build sidecar network
    pub fn join_network(mut self) -> Self {
        self.join_network = true;
        self
    }

    /// Forward the executor's `$HOME` into the container
    pub fn export_home(mut self) -> Self {
        self.export_home = true;
        self
    }

    /// Run the wrapped command in a subdirectory of the checkout
    pub fn workdir(mut self, subdir: impl Into<String>) -> Self {
        self.workdir = subdir.into();
        self
    }

    /// Override the wrapped command
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Render the bash function definition
    pub fn render(&self) -> String {
        let mut script = format!("function {}() {{\n    docker run \\\n", self.function_name);
        script.push_str("        -u $HOST_UID \\\n");
        script.push_str("        -v /build-data/$COMPOSE_PROJECT_NAME/passwd:/etc/passwd \\\n");
        script.push_str("        -v $COMPOSE_PROJECT_NAME-build-data:/srv/ci/build-dir/ \\\n");
        for flag in &self.env_flags {
            script.push_str(&format!("        -e {} \\\n", flag));
        }
        if self.export_home {
            script.push_str("        -e HOME=$HOME \\\n");
        }
        script.push_str("        --name $COMPOSE_PROJECT_NAME-adhoc \\\n");
        if self.join_network {
            script.push_str("        --network $COMPOSE_PROJECT_NAME-test \\\n");
        }
        script.push_str("        --rm \\\n");
        script.push_str(&format!("        {} \\\n", self.image));
        script.push_str(&format!(
            "        bin/bash -c \"cd $PWD{}; {}\"\n}}\n\n",
            self.workdir, self.command
        ));
        script
    }
}

/// Script starting the database sidecars for one suite family
///
/// `${service}` is a plan-time placeholder resolved from the environment
/// binding (e.g. `mariadb10`, `postgres10`, `sqlite`).
pub fn start_sidecars(suite: &str) -> String {
    format!(
        "{}cd {}\necho COMPOSE_PROJECT_NAME=$COMPOSE_PROJECT_NAME-sib > .env\ndocker-compose run start_dependencies_{}_${{service}}\n",
        BASH_HEADER, COMPOSE_PROJECT_PATH, suite
    )
}

/// Script stopping whatever sidecars a stage started
pub fn stop_sidecars() -> String {
    format!("{}cd {}\ndocker-compose down -v\n", BASH_HEADER, COMPOSE_PROJECT_PATH)
}

/// The composer shim with `COMPOSER_ROOT_VERSION` forwarded from the step
/// environment
pub fn composer_shim(runtime: &str) -> String {
    ContainerShim::new("composer", runtime)
        .env("COMPOSER_ROOT_VERSION=$COMPOSER_ROOT_VERSION")
        .export_home()
        .command("composer $*")
        .render()
}
