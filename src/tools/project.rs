/// Project tools
///
/// Projects group applications and databases in Dokploy.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::catalog::{fetch_tool, is_empty_body, post_tool, read_hints, write_hints, ToolSpec};
use super::{ToolDefinition, ToolError, ToolReply};
use crate::api::DokployApi;

/// Tool taking no arguments
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct NoInput {}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdInput {
    /// The ID of the project.
    #[schemars(length(min = 1))]
    pub project_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    /// The name of the project.
    #[schemars(length(min = 1))]
    pub name: String,
    /// An optional description for the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional environment variables for the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
    /// The ID of the project to update.
    #[schemars(length(min = 1))]
    pub project_id: String,
    /// The new name of the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(min = 1))]
    pub name: Option<String>,
    /// The new description for the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The creation date of the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// The organization ID of the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Environment variables for the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
}

/// Kinds of service a project can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Application,
    Postgres,
    Mariadb,
    Mongo,
    Mysql,
    Redis,
    Compose,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SelectedService {
    /// The ID of the service.
    pub id: String,
    /// The type of the service.
    #[serde(rename = "type")]
    pub service_type: ServiceType,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateProjectInput {
    /// The ID of the source project to duplicate.
    #[schemars(length(min = 1))]
    pub source_project_id: String,
    /// The name for the new duplicated project.
    #[schemars(length(min = 1))]
    pub name: String,
    /// An optional description for the duplicated project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether to include services in the duplication. Defaults to true.
    #[serde(default = "default_true")]
    pub include_services: bool,
    /// Services to include. When includeServices is true, list every service of the source
    /// project you want copied with its ID and type; services are not added implicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_services: Option<Vec<SelectedService>>,
}

fn default_true() -> bool {
    true
}

pub fn tools(api: &Arc<dyn DokployApi>) -> Result<Vec<ToolDefinition>, ToolError> {
    Ok(vec![
        project_all(api)?,
        fetch_tool(
            api,
            ToolSpec::new(
                "project-one",
                "Gets a specific project by its ID in Dokploy.",
                read_hints("Get Project Details"),
            ),
            "/project.one",
            |i: &ProjectIdInput| format!("Successfully fetched project \"{}\"", i.project_id),
            |i: &ProjectIdInput| {
                (
                    "Failed to fetch project".to_string(),
                    format!("Project with ID \"{}\" not found", i.project_id),
                )
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "project-create",
                "Creates a new project in Dokploy.",
                write_hints("Create Project", false, false),
            ),
            "/project.create",
            |i: &CreateProjectInput| format!("Project \"{}\" created successfully", i.name),
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "project-update",
                "Updates an existing project in Dokploy.",
                write_hints("Update Project", true, false),
            ),
            "/project.update",
            |i: &UpdateProjectInput| format!("Project \"{}\" updated successfully", i.project_id),
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "project-duplicate",
                "Duplicates an existing project in Dokploy with optional service selection.",
                write_hints("Duplicate Project", false, false),
            ),
            "/project.duplicate",
            |i: &DuplicateProjectInput| {
                format!(
                    "Project \"{}\" duplicated successfully from source project \"{}\"",
                    i.name, i.source_project_id
                )
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "project-remove",
                "Removes/deletes an existing project in Dokploy.",
                write_hints("Remove Project", true, false),
            ),
            "/project.remove",
            |i: &ProjectIdInput| format!("Project \"{}\" removed successfully", i.project_id),
        )?,
    ])
}

/// `project-all` trims the full project tree down to a summary per project
fn project_all(api: &Arc<dyn DokployApi>) -> Result<ToolDefinition, ToolError> {
    let api = api.clone();
    ToolDefinition::typed(
        "project-all",
        "Lists all projects in Dokploy with optimized response size suitable for LLM consumption. \
         Returns summary data including project info, service counts, and basic service details.",
        read_hints("List All Projects"),
        move |_: NoInput| {
            let api = api.clone();
            async move {
                let data = api.get("/project.all", &[]).await?;
                if is_empty_body(&data) {
                    return Ok(ToolReply::failure(
                        "Failed to fetch projects",
                        "No response data received",
                    ));
                }

                let projects = data.as_array().map(Vec::as_slice).unwrap_or_default();
                let summary = projects.iter().map(summarize_project).collect::<Vec<_>>();
                Ok(ToolReply::success(
                    "Successfully fetched projects summary",
                    Value::Array(summary),
                ))
            }
        },
    )
}

fn count(project: &Value, key: &str) -> usize {
    project.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

fn items<'a>(project: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    project
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn field(item: &Value, key: &str) -> Value {
    item.get(key).cloned().unwrap_or(Value::Null)
}

pub fn summarize_project(project: &Value) -> Value {
    let applications = items(project, "applications")
        .map(|app| {
            json!({
                "applicationId": field(app, "applicationId"),
                "name": field(app, "name"),
                "appName": field(app, "appName"),
                "applicationStatus": field(app, "applicationStatus"),
                "sourceType": field(app, "sourceType"),
                "buildType": field(app, "buildType"),
                "domainCount": count(app, "domains"),
            })
        })
        .collect::<Vec<_>>();

    let postgres = items(project, "postgres")
        .map(|db| {
            json!({
                "postgresId": field(db, "postgresId"),
                "name": field(db, "name"),
                "appName": field(db, "appName"),
                "applicationStatus": field(db, "applicationStatus"),
                "databaseName": field(db, "databaseName"),
            })
        })
        .collect::<Vec<_>>();

    let compose = items(project, "compose")
        .map(|c| {
            json!({
                "composeId": field(c, "composeId"),
                "name": field(c, "name"),
                "appName": field(c, "appName"),
                "composeStatus": field(c, "composeStatus"),
                "sourceType": field(c, "sourceType"),
                "domainCount": count(c, "domains"),
            })
        })
        .collect::<Vec<_>>();

    json!({
        "projectId": field(project, "projectId"),
        "name": field(project, "name"),
        "description": field(project, "description"),
        "createdAt": field(project, "createdAt"),
        "organizationId": field(project, "organizationId"),
        "serviceCounts": {
            "applications": count(project, "applications"),
            "postgres": count(project, "postgres"),
            "mysql": count(project, "mysql"),
            "mariadb": count(project, "mariadb"),
            "mongo": count(project, "mongo"),
            "redis": count(project, "redis"),
            "compose": count(project, "compose"),
        },
        "services": {
            "applications": applications,
            "postgres": postgres,
            "compose": compose,
        },
    })
}
