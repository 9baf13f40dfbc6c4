/// Database tools
///
/// MySQL and PostgreSQL expose the same thirteen operations in Dokploy and
/// differ only in their ID field and their create/update payloads. The
/// operations are written once against `EngineInputs` and instantiated per
/// engine.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::application::ApplicationStatus;
use super::catalog::{fetch_tool, post_tool, read_hints, write_hints, ToolSpec};
use super::{ToolDefinition, ToolError};
use crate::api::DokployApi;

/// Database engines with a tool family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseEngine {
    Mysql,
    Postgres,
}

impl DatabaseEngine {
    /// Tool name prefix and Dokploy router name
    pub fn prefix(self) -> &'static str {
        match self {
            DatabaseEngine::Mysql => "mysql",
            DatabaseEngine::Postgres => "postgres",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DatabaseEngine::Mysql => "MySQL",
            DatabaseEngine::Postgres => "PostgreSQL",
        }
    }

    pub fn tool_name(self, operation: &str) -> String {
        format!("{}-{}", self.prefix(), operation)
    }

    pub fn endpoint(self, operation: &str) -> String {
        format!("/{}.{}", self.prefix(), operation)
    }

    fn spec(self, operation: &str, description: &str, annotations: Hints) -> ToolSpec {
        let title = annotations.title.replace("{}", self.label());
        let annotations = match annotations.kind {
            HintKind::Read => read_hints(&title),
            HintKind::Write { destructive, idempotent } => write_hints(&title, destructive, idempotent),
        };
        ToolSpec::new(
            self.tool_name(operation),
            description.replace("{}", self.label()),
            annotations,
        )
    }
}

struct Hints {
    title: &'static str,
    kind: HintKind,
}

enum HintKind {
    Read,
    Write { destructive: bool, idempotent: bool },
}

fn reads(title: &'static str) -> Hints {
    Hints { title, kind: HintKind::Read }
}

fn writes(title: &'static str, destructive: bool, idempotent: bool) -> Hints {
    Hints {
        title,
        kind: HintKind::Write { destructive, idempotent },
    }
}

/// Bounds every tool input needs
pub trait ToolInput: JsonSchema + DeserializeOwned + Serialize + Send + 'static {}

impl<T> ToolInput for T where T: JsonSchema + DeserializeOwned + Serialize + Send + 'static {}

/// Input addressed at one existing database
pub trait DatabaseInput: ToolInput {
    fn database_id(&self) -> &str;
}

/// Input types of one engine's tool family
pub trait EngineInputs: 'static {
    const ENGINE: DatabaseEngine;

    type Create: ToolInput;
    type Update: DatabaseInput;
    type Id: DatabaseInput;
    type Move: DatabaseInput;
    type Reload: DatabaseInput;
    type Status: DatabaseInput;
    type Environment: DatabaseInput;
    type ExternalPort: DatabaseInput;

    fn created_name(input: &Self::Create) -> &str;
    fn target_project(input: &Self::Move) -> &str;
    fn new_status(input: &Self::Status) -> ApplicationStatus;
}

/// Inputs that only differ between engines by the name of the ID field
macro_rules! keyed_inputs {
    ($module:ident, $id:tt, $id_doc:tt) => {
        pub mod $module {
            use schemars::JsonSchema;
            use serde::{Deserialize, Serialize};

            use super::{ApplicationStatus, DatabaseInput};

            #[derive(Debug, Deserialize, Serialize, JsonSchema)]
            pub struct IdInput {
                #[doc = $id_doc]
                #[serde(rename = $id)]
                #[schemars(length(min = 1))]
                pub id: String,
            }

            #[derive(Debug, Deserialize, Serialize, JsonSchema)]
            #[serde(rename_all = "camelCase")]
            pub struct MoveInput {
                #[doc = $id_doc]
                #[serde(rename = $id)]
                #[schemars(length(min = 1))]
                pub id: String,
                /// The ID of the target project to move the database to.
                pub target_project_id: String,
            }

            #[derive(Debug, Deserialize, Serialize, JsonSchema)]
            #[serde(rename_all = "camelCase")]
            pub struct ReloadInput {
                #[doc = $id_doc]
                #[serde(rename = $id)]
                #[schemars(length(min = 1))]
                pub id: String,
                /// The app name of the database to reload.
                #[schemars(length(min = 1))]
                pub app_name: String,
            }

            #[derive(Debug, Deserialize, Serialize, JsonSchema)]
            #[serde(rename_all = "camelCase")]
            pub struct StatusInput {
                #[doc = $id_doc]
                #[serde(rename = $id)]
                #[schemars(length(min = 1))]
                pub id: String,
                /// The new status for the database.
                pub application_status: ApplicationStatus,
            }

            #[derive(Debug, Deserialize, Serialize, JsonSchema)]
            pub struct EnvironmentInput {
                #[doc = $id_doc]
                #[serde(rename = $id)]
                #[schemars(length(min = 1))]
                pub id: String,
                /// Environment variables to save for the database.
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub env: Option<String>,
            }

            #[derive(Debug, Deserialize, Serialize, JsonSchema)]
            #[serde(rename_all = "camelCase")]
            pub struct ExternalPortInput {
                #[doc = $id_doc]
                #[serde(rename = $id)]
                #[schemars(length(min = 1))]
                pub id: String,
                /// The external port number to expose the database on, or null to close it.
                #[serde(default)]
                pub external_port: Option<u16>,
            }

            impl DatabaseInput for IdInput {
                fn database_id(&self) -> &str {
                    &self.id
                }
            }

            impl DatabaseInput for MoveInput {
                fn database_id(&self) -> &str {
                    &self.id
                }
            }

            impl DatabaseInput for ReloadInput {
                fn database_id(&self) -> &str {
                    &self.id
                }
            }

            impl DatabaseInput for StatusInput {
                fn database_id(&self) -> &str {
                    &self.id
                }
            }

            impl DatabaseInput for EnvironmentInput {
                fn database_id(&self) -> &str {
                    &self.id
                }
            }

            impl DatabaseInput for ExternalPortInput {
                fn database_id(&self) -> &str {
                    &self.id
                }
            }
        }
    };
}

keyed_inputs!(mysql, "mysqlId", "The ID of the MySQL database.");
keyed_inputs!(postgres, "postgresId", "The ID of the PostgreSQL database.");

fn default_mysql_image() -> String {
    "mysql:8".to_string()
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MysqlCreateInput {
    /// The name of the MySQL database.
    #[schemars(length(min = 1))]
    pub name: String,
    /// The app name for the MySQL database.
    #[schemars(length(min = 1))]
    pub app_name: String,
    /// The name of the database to create.
    #[schemars(length(min = 1))]
    pub database_name: String,
    /// The username for database access.
    #[schemars(length(min = 1))]
    pub database_user: String,
    /// The password for database access.
    pub database_password: String,
    /// The root password for MySQL.
    pub database_root_password: String,
    /// Docker image to use for MySQL. Defaults to mysql:8.
    #[serde(default = "default_mysql_image")]
    pub docker_image: String,
    /// The ID of the project where the database will be created.
    pub project_id: String,
    /// An optional description for the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The ID of the server where the database will be deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostgresCreateInput {
    /// The name of the PostgreSQL database.
    #[schemars(length(min = 1))]
    pub name: String,
    /// The app name for the PostgreSQL database.
    pub app_name: String,
    /// The name of the database to create.
    #[schemars(length(min = 1))]
    pub database_name: String,
    /// The username for database access.
    #[schemars(length(min = 1))]
    pub database_user: String,
    /// The password for database access.
    pub database_password: String,
    /// Docker image to use for PostgreSQL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    /// The ID of the project where the database will be created.
    pub project_id: String,
    /// An optional description for the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The ID of the server where the database will be deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
}

/// Settings both engines accept on update; only fields that were given are sent
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSettings {
    /// The new name of the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(min = 1))]
    pub name: Option<String>,
    /// The new app name of the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// The new description for the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The new database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(min = 1))]
    pub database_name: Option<String>,
    /// The new database username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(min = 1))]
    pub database_user: Option<String>,
    /// The new database password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_password: Option<String>,
    /// Custom command to run in the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Environment variables for the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    /// Memory reservation for the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_reservation: Option<String>,
    /// Memory limit for the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    /// CPU reservation for the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_reservation: Option<String>,
    /// CPU limit for the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<String>,
    /// External port to expose the database on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_port: Option<u16>,
    /// The status of the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_status: Option<ApplicationStatus>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// The ID of the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MysqlUpdateInput {
    /// The ID of the MySQL database to update.
    #[schemars(length(min = 1))]
    pub mysql_id: String,
    /// The root password for MySQL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_root_password: Option<String>,
    /// Docker image to use for MySQL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    #[serde(flatten)]
    pub settings: DatabaseSettings,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostgresUpdateInput {
    /// The ID of the PostgreSQL database to update.
    #[schemars(length(min = 1))]
    pub postgres_id: String,
    /// The new Docker image for PostgreSQL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    #[serde(flatten)]
    pub settings: DatabaseSettings,
}

impl DatabaseInput for MysqlUpdateInput {
    fn database_id(&self) -> &str {
        &self.mysql_id
    }
}

impl DatabaseInput for PostgresUpdateInput {
    fn database_id(&self) -> &str {
        &self.postgres_id
    }
}

/// MySQL tool family
pub struct Mysql;

/// PostgreSQL tool family
pub struct Postgres;

impl EngineInputs for Mysql {
    const ENGINE: DatabaseEngine = DatabaseEngine::Mysql;

    type Create = MysqlCreateInput;
    type Update = MysqlUpdateInput;
    type Id = mysql::IdInput;
    type Move = mysql::MoveInput;
    type Reload = mysql::ReloadInput;
    type Status = mysql::StatusInput;
    type Environment = mysql::EnvironmentInput;
    type ExternalPort = mysql::ExternalPortInput;

    fn created_name(input: &Self::Create) -> &str {
        &input.name
    }

    fn target_project(input: &Self::Move) -> &str {
        &input.target_project_id
    }

    fn new_status(input: &Self::Status) -> ApplicationStatus {
        input.application_status
    }
}

impl EngineInputs for Postgres {
    const ENGINE: DatabaseEngine = DatabaseEngine::Postgres;

    type Create = PostgresCreateInput;
    type Update = PostgresUpdateInput;
    type Id = postgres::IdInput;
    type Move = postgres::MoveInput;
    type Reload = postgres::ReloadInput;
    type Status = postgres::StatusInput;
    type Environment = postgres::EnvironmentInput;
    type ExternalPort = postgres::ExternalPortInput;

    fn created_name(input: &Self::Create) -> &str {
        &input.name
    }

    fn target_project(input: &Self::Move) -> &str {
        &input.target_project_id
    }

    fn new_status(input: &Self::Status) -> ApplicationStatus {
        input.application_status
    }
}

pub fn tools(api: &Arc<dyn DokployApi>) -> Result<Vec<ToolDefinition>, ToolError> {
    let mut tools = engine_tools::<Mysql>(api)?;
    tools.extend(engine_tools::<Postgres>(api)?);
    Ok(tools)
}

/// POST operation whose message only names the database
fn keyed<I: DatabaseInput>(
    api: &Arc<dyn DokployApi>,
    engine: DatabaseEngine,
    spec: ToolSpec,
    operation: &str,
    outcome: &'static str,
) -> Result<ToolDefinition, ToolError> {
    let label = engine.label();
    post_tool(api, spec, engine.endpoint(operation), move |i: &I| {
        format!("{} database \"{}\" {}", label, i.database_id(), outcome)
    })
}

/// The thirteen operations of one engine
pub fn engine_tools<E: EngineInputs>(api: &Arc<dyn DokployApi>) -> Result<Vec<ToolDefinition>, ToolError> {
    let engine = E::ENGINE;
    let label = engine.label();

    Ok(vec![
        fetch_tool(
            api,
            engine.spec("one", "Gets a specific {} database by its ID in Dokploy.", reads("Get {} Database Details")),
            engine.endpoint("one"),
            move |i: &E::Id| format!("Successfully fetched {} database \"{}\"", label, i.database_id()),
            move |i: &E::Id| {
                (
                    format!("Failed to fetch {} database", label),
                    format!("{} database with ID \"{}\" not found", label, i.database_id()),
                )
            },
        )?,
        post_tool(
            api,
            engine.spec(
                "create",
                "Creates a new {} database in Dokploy.",
                writes("Create {} Database", false, false),
            ),
            engine.endpoint("create"),
            move |i: &E::Create| format!("{} database \"{}\" created successfully", label, E::created_name(i)),
        )?,
        keyed::<E::Update>(
            api,
            engine,
            engine.spec(
                "update",
                "Updates an existing {} database in Dokploy.",
                writes("Update {} Database", true, false),
            ),
            "update",
            "updated successfully",
        )?,
        keyed::<E::Id>(
            api,
            engine,
            engine.spec(
                "remove",
                "Removes/deletes a {} database from Dokploy.",
                writes("Remove {} Database", true, false),
            ),
            "remove",
            "removed successfully",
        )?,
        post_tool(
            api,
            engine.spec(
                "move",
                "Moves a {} database to a different project in Dokploy.",
                writes("Move {} Database", true, false),
            ),
            engine.endpoint("move"),
            move |i: &E::Move| {
                format!(
                    "{} database \"{}\" moved to project \"{}\" successfully",
                    label,
                    i.database_id(),
                    E::target_project(i)
                )
            },
        )?,
        keyed::<E::Id>(
            api,
            engine,
            engine.spec("deploy", "Deploys a {} database in Dokploy.", writes("Deploy {} Database", false, false)),
            "deploy",
            "deployment started successfully",
        )?,
        keyed::<E::Id>(
            api,
            engine,
            engine.spec("rebuild", "Rebuilds a {} database in Dokploy.", writes("Rebuild {} Database", true, false)),
            "rebuild",
            "rebuild started successfully",
        )?,
        keyed::<E::Id>(
            api,
            engine,
            engine.spec("start", "Starts a {} database in Dokploy.", writes("Start {} Database", false, true)),
            "start",
            "started successfully",
        )?,
        keyed::<E::Id>(
            api,
            engine,
            engine.spec("stop", "Stops a {} database in Dokploy.", writes("Stop {} Database", true, true)),
            "stop",
            "stopped successfully",
        )?,
        keyed::<E::Reload>(
            api,
            engine,
            engine.spec("reload", "Reloads a {} database in Dokploy.", writes("Reload {} Database", false, false)),
            "reload",
            "reloaded successfully",
        )?,
        post_tool(
            api,
            engine.spec(
                "changeStatus",
                "Changes the status of a {} database in Dokploy.",
                writes("Change {} Database Status", false, true),
            ),
            engine.endpoint("changeStatus"),
            move |i: &E::Status| {
                format!(
                    "{} database \"{}\" status changed to \"{}\" successfully",
                    label,
                    i.database_id(),
                    E::new_status(i)
                )
            },
        )?,
        post_tool(
            api,
            engine.spec(
                "saveEnvironment",
                "Saves environment variables for a {} database in Dokploy.",
                writes("Save {} Environment", true, false),
            ),
            engine.endpoint("saveEnvironment"),
            move |i: &E::Environment| {
                format!(
                    "Environment variables for {} database \"{}\" saved successfully",
                    label,
                    i.database_id()
                )
            },
        )?,
        post_tool(
            api,
            engine.spec(
                "saveExternalPort",
                "Saves external port configuration for a {} database in Dokploy.",
                writes("Save {} External Port", false, true),
            ),
            engine.endpoint("saveExternalPort"),
            move |i: &E::ExternalPort| {
                format!(
                    "External port for {} database \"{}\" saved successfully",
                    label,
                    i.database_id()
                )
            },
        )?,
    ])
}
