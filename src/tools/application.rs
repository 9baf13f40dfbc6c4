/// Application tools
///
/// Lifecycle, build and source-provider operations for Dokploy applications.
/// All of them are passthroughs onto `/application.<operation>`.

use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::catalog::{fetch_tool, post_tool, read_hints, write_hints, ToolSpec};
use super::{ToolDefinition, ToolError};
use crate::api::DokployApi;

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationIdInput {
    /// The ID of the application.
    pub application_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppNameInput {
    /// The app name of the application to get monitoring data for.
    pub app_name: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationInput {
    /// The name of the application.
    #[schemars(length(min = 1))]
    pub name: String,
    /// The app name for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// An optional description for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The ID of the project where the application will be created.
    #[schemars(length(min = 1))]
    pub project_id: String,
    /// The ID of the server where the application will be deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveApplicationInput {
    /// The ID of the application to move.
    pub application_id: String,
    /// The ID of the destination project.
    pub target_project_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReloadApplicationInput {
    /// The ID of the application to reload.
    pub application_id: String,
    /// The app name of the application to reload.
    pub app_name: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TraefikConfigInput {
    /// The ID of the application to update Traefik config for.
    pub application_id: String,
    /// The new Traefik configuration content.
    pub traefik_config: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BuildType {
    Dockerfile,
    HerokuBuildpacks,
    PaketoBuildpacks,
    Nixpacks,
    Static,
    Railpack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Github,
    Docker,
    Git,
    Gitlab,
    Bitbucket,
    Gitea,
    Drop,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    #[default]
    Push,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CertificateType {
    Letsencrypt,
    None,
    Custom,
}

/// Runtime status shared by applications and databases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Idle,
    Running,
    Done,
    Error,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            ApplicationStatus::Idle => "idle",
            ApplicationStatus::Running => "running",
            ApplicationStatus::Done => "done",
            ApplicationStatus::Error => "error",
        };
        f.write_str(status)
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildTypeInput {
    /// The ID of the application to save build type for.
    pub application_id: String,
    /// The build type for the application.
    pub build_type: BuildType,
    /// Docker context path.
    #[serde(default)]
    pub docker_context_path: Option<String>,
    /// Docker build stage.
    #[serde(default)]
    pub docker_build_stage: Option<String>,
    /// Dockerfile content or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    /// Heroku version for heroku_buildpacks build type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heroku_version: Option<String>,
    /// Directory to publish the built application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_directory: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInput {
    /// The ID of the application to save environment for.
    pub application_id: String,
    /// Environment variables to save for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    /// Build arguments for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_args: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GithubProviderInput {
    /// The ID of the application to save GitHub provider for.
    pub application_id: String,
    /// The GitHub repository URL or name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// The branch to use from the repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// The GitHub repository owner.
    #[serde(default)]
    pub owner: Option<String>,
    /// The path within the repository to build from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_path: Option<String>,
    /// The GitHub integration ID.
    #[serde(default)]
    pub github_id: Option<String>,
    /// Paths to watch for changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_paths: Option<Vec<String>>,
    /// Whether to enable git submodules.
    pub enable_submodules: bool,
    /// The trigger type for deployments. Defaults to push.
    #[serde(default)]
    pub trigger_type: TriggerType,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GitlabProviderInput {
    /// The ID of the application to save GitLab provider for.
    pub application_id: String,
    /// The branch to use from the repository.
    #[serde(default)]
    pub gitlab_branch: Option<String>,
    /// The path within the repository to build from.
    #[serde(default)]
    pub gitlab_build_path: Option<String>,
    /// The GitLab repository owner.
    #[serde(default)]
    pub gitlab_owner: Option<String>,
    /// The GitLab repository URL or name.
    #[serde(default)]
    pub gitlab_repository: Option<String>,
    /// The GitLab integration ID.
    #[serde(default)]
    pub gitlab_id: Option<String>,
    /// The GitLab project ID.
    #[serde(default)]
    pub gitlab_project_id: Option<i64>,
    /// The GitLab path namespace.
    #[serde(default)]
    pub gitlab_path_namespace: Option<String>,
    /// Paths to watch for changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_paths: Option<Vec<String>>,
    /// Whether to enable git submodules.
    pub enable_submodules: bool,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BitbucketProviderInput {
    /// The ID of the application to save Bitbucket provider for.
    pub application_id: String,
    /// The Bitbucket repository URL or name.
    #[serde(default)]
    pub bitbucket_repository: Option<String>,
    /// The Bitbucket repository owner.
    #[serde(default)]
    pub bitbucket_owner: Option<String>,
    /// The branch to use from the repository.
    #[serde(default)]
    pub bitbucket_branch: Option<String>,
    /// The path within the repository to build from.
    #[serde(default)]
    pub bitbucket_build_path: Option<String>,
    /// The Bitbucket integration ID.
    #[serde(default)]
    pub bitbucket_id: Option<String>,
    /// Array of paths to watch for changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_paths: Option<Vec<String>>,
    /// Whether to enable submodules.
    pub enable_submodules: bool,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GiteaProviderInput {
    /// The ID of the application to save Gitea provider for.
    pub application_id: String,
    /// The Gitea repository URL or name.
    #[serde(default)]
    pub gitea_repository: Option<String>,
    /// The Gitea repository owner.
    #[serde(default)]
    pub gitea_owner: Option<String>,
    /// The branch to use from the repository.
    #[serde(default)]
    pub gitea_branch: Option<String>,
    /// The path within the repository to build from.
    #[serde(default)]
    pub gitea_build_path: Option<String>,
    /// The Gitea integration ID.
    #[serde(default)]
    pub gitea_id: Option<String>,
    /// Array of paths to watch for changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_paths: Option<Vec<String>>,
    /// Whether to enable submodules.
    pub enable_submodules: bool,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GitProviderInput {
    /// The ID of the application to save Git provider for.
    pub application_id: String,
    /// The custom Git repository URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_git_url: Option<String>,
    /// The branch to use from the repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_git_branch: Option<String>,
    /// The path within the repository to build from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_git_build_path: Option<String>,
    /// The SSH key ID for Git authentication.
    #[serde(default, rename = "customGitSSHKeyId", skip_serializing_if = "Option::is_none")]
    pub custom_git_ssh_key_id: Option<String>,
    /// Array of paths to watch for changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_paths: Option<Vec<String>>,
    /// Whether to enable submodules.
    pub enable_submodules: bool,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DockerProviderInput {
    /// The ID of the application to save Docker provider for.
    pub application_id: String,
    /// The Docker image to use for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    /// Username for Docker registry authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password for Docker registry authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// The Docker registry URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
}

/// Every field except `applicationId` is optional and only sent when given
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationInput {
    /// The ID of the application to update.
    pub application_id: String,
    /// The new name of the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(min = 1))]
    pub name: Option<String>,
    /// The new app name of the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// The new description for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Environment variables for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    /// Preview environment variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_env: Option<String>,
    /// Paths to watch for changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_paths: Option<Vec<String>>,
    /// Preview build arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_build_args: Option<String>,
    /// Preview wildcard configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_wildcard: Option<String>,
    /// Preview port number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_port: Option<u32>,
    /// Enable HTTPS for preview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_https: Option<bool>,
    /// Preview path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_path: Option<String>,
    /// Preview certificate type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_certificate_type: Option<CertificateType>,
    /// Custom certificate resolver for preview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_custom_cert_resolver: Option<String>,
    /// Preview deployment limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_limit: Option<u32>,
    /// Whether preview deployments are active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_preview_deployments_active: Option<bool>,
    /// Build arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_args: Option<String>,
    /// Memory reservation for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_reservation: Option<String>,
    /// Memory limit for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    /// CPU reservation for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_reservation: Option<String>,
    /// CPU limit for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<String>,
    /// Application title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Whether the application is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Application subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Command to run the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Refresh token for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Source type for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    /// Whether to clean cache on build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_cache: Option<bool>,
    /// Repository URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Repository owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Repository branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Build path within repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_path: Option<String>,
    /// Trigger type for deployments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<TriggerType>,
    /// Whether to auto-deploy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<bool>,
    /// GitLab project ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_project_id: Option<i64>,
    /// GitLab repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_repository: Option<String>,
    /// GitLab repository owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_owner: Option<String>,
    /// GitLab branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_branch: Option<String>,
    /// GitLab build path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_build_path: Option<String>,
    /// GitLab path namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_path_namespace: Option<String>,
    /// Gitea repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitea_repository: Option<String>,
    /// Gitea repository owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitea_owner: Option<String>,
    /// Gitea branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitea_branch: Option<String>,
    /// Gitea build path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitea_build_path: Option<String>,
    /// Bitbucket repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitbucket_repository: Option<String>,
    /// Bitbucket repository owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitbucket_owner: Option<String>,
    /// Bitbucket branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitbucket_branch: Option<String>,
    /// Bitbucket build path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitbucket_build_path: Option<String>,
    /// Username for authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password for authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Docker image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    /// Docker registry URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
    /// Custom Git URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_git_url: Option<String>,
    /// Custom Git branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_git_branch: Option<String>,
    /// Custom Git build path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_git_build_path: Option<String>,
    /// Custom Git SSH key ID.
    #[serde(default, rename = "customGitSSHKeyId", skip_serializing_if = "Option::is_none")]
    pub custom_git_ssh_key_id: Option<String>,
    /// Whether to enable Git submodules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_submodules: Option<bool>,
    /// Dockerfile content or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    /// Docker context path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_context_path: Option<String>,
    /// Docker build stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_build_stage: Option<String>,
    /// Drop build path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_build_path: Option<String>,
    /// Number of replicas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    /// Application status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_status: Option<ApplicationStatus>,
    /// Build type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_type: Option<BuildType>,
    /// Heroku version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heroku_version: Option<String>,
    /// Publish directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_directory: Option<String>,
    /// Creation date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Registry ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    /// Project ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// GitHub integration ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_id: Option<String>,
    /// GitLab integration ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_id: Option<String>,
    /// Gitea integration ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitea_id: Option<String>,
    /// Bitbucket integration ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitbucket_id: Option<String>,
    /// The ID of the server where the application is deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
}

/// POST tool keyed only by `applicationId`
fn by_id(
    api: &Arc<dyn DokployApi>,
    spec: ToolSpec,
    endpoint: &'static str,
    outcome: &'static str,
) -> Result<ToolDefinition, ToolError> {
    post_tool(api, spec, endpoint, move |i: &ApplicationIdInput| {
        format!("Application \"{}\" {}", i.application_id, outcome)
    })
}

pub fn tools(api: &Arc<dyn DokployApi>) -> Result<Vec<ToolDefinition>, ToolError> {
    Ok(vec![
        fetch_tool(
            api,
            ToolSpec::new(
                "application-one",
                "Gets a specific application by its ID in Dokploy.",
                read_hints("Get Application Details"),
            ),
            "/application.one",
            |i: &ApplicationIdInput| format!("Successfully fetched application \"{}\"", i.application_id),
            |i: &ApplicationIdInput| {
                (
                    "Failed to fetch application".to_string(),
                    format!("Application with ID \"{}\" not found", i.application_id),
                )
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-create",
                "Creates a new application in Dokploy.",
                write_hints("Create Application", false, false),
            ),
            "/application.create",
            |i: &CreateApplicationInput| {
                format!(
                    "Application \"{}\" created successfully in project \"{}\"",
                    i.name, i.project_id
                )
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-update",
                "Updates an existing application in Dokploy.",
                write_hints("Update Application", true, false),
            ),
            "/application.update",
            |i: &UpdateApplicationInput| format!("Application \"{}\" updated successfully", i.application_id),
        )?,
        by_id(
            api,
            ToolSpec::new(
                "application-delete",
                "Deletes an application in Dokploy.",
                write_hints("Delete Application", true, false),
            ),
            "/application.delete",
            "deleted successfully",
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-move",
                "Moves an application to a different project in Dokploy.",
                write_hints("Move Application", true, false),
            ),
            "/application.move",
            |i: &MoveApplicationInput| {
                format!(
                    "Application \"{}\" moved to project \"{}\" successfully",
                    i.application_id, i.target_project_id
                )
            },
        )?,
        by_id(
            api,
            ToolSpec::new(
                "application-deploy",
                "Deploys an application in Dokploy.",
                write_hints("Deploy Application", false, false),
            ),
            "/application.deploy",
            "deployment started successfully",
        )?,
        by_id(
            api,
            ToolSpec::new(
                "application-redeploy",
                "Redeploys an application in Dokploy.",
                write_hints("Redeploy Application", false, false),
            ),
            "/application.redeploy",
            "redeployment started successfully",
        )?,
        by_id(
            api,
            ToolSpec::new(
                "application-start",
                "Starts an application in Dokploy.",
                write_hints("Start Application", false, false),
            ),
            "/application.start",
            "started successfully",
        )?,
        by_id(
            api,
            ToolSpec::new(
                "application-stop",
                "Stops an application in Dokploy.",
                write_hints("Stop Application", false, false),
            ),
            "/application.stop",
            "stopped successfully",
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-reload",
                "Reloads an application in Dokploy.",
                write_hints("Reload Application", false, false),
            ),
            "/application.reload",
            |i: &ReloadApplicationInput| format!("Application \"{}\" reloaded successfully", i.application_id),
        )?,
        by_id(
            api,
            ToolSpec::new(
                "application-markRunning",
                "Marks an application as running in Dokploy.",
                write_hints("Mark Application as Running", false, true),
            ),
            "/application.markRunning",
            "marked as running successfully",
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-cleanQueues",
                "Cleans the queues for an application in Dokploy.",
                write_hints("Clean Application Queues", false, true),
            ),
            "/application.cleanQueues",
            |i: &ApplicationIdInput| {
                format!("Queues for application \"{}\" cleaned successfully", i.application_id)
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-refreshToken",
                "Refreshes the token for an application in Dokploy.",
                write_hints("Refresh Application Token", false, false),
            ),
            "/application.refreshToken",
            |i: &ApplicationIdInput| {
                format!("Token for application \"{}\" refreshed successfully", i.application_id)
            },
        )?,
        fetch_tool(
            api,
            ToolSpec::new(
                "application-readTraefikConfig",
                "Reads Traefik configuration for an application in Dokploy.",
                read_hints("Read Application Traefik Config"),
            ),
            "/application.readTraefikConfig",
            |i: &ApplicationIdInput| {
                format!(
                    "Successfully fetched Traefik configuration for application \"{}\"",
                    i.application_id
                )
            },
            |i: &ApplicationIdInput| {
                (
                    "Failed to fetch application Traefik configuration".to_string(),
                    format!("No Traefik configuration found for application \"{}\"", i.application_id),
                )
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-updateTraefikConfig",
                "Updates Traefik configuration for an application in Dokploy.",
                write_hints("Update Application Traefik Config", true, false),
            ),
            "/application.updateTraefikConfig",
            |i: &TraefikConfigInput| {
                format!(
                    "Traefik configuration for application \"{}\" updated successfully",
                    i.application_id
                )
            },
        )?,
        fetch_tool(
            api,
            ToolSpec::new(
                "application-readAppMonitoring",
                "Reads monitoring data for an application in Dokploy.",
                read_hints("Read Application Monitoring"),
            ),
            "/application.readAppMonitoring",
            |i: &AppNameInput| {
                format!("Successfully fetched monitoring data for application \"{}\"", i.app_name)
            },
            |i: &AppNameInput| {
                (
                    "Failed to fetch application monitoring data".to_string(),
                    format!("No monitoring data found for application \"{}\"", i.app_name),
                )
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-saveBuildType",
                "Saves build type configuration for an application in Dokploy.",
                write_hints("Save Application Build Type", true, false),
            ),
            "/application.saveBuildType",
            |i: &BuildTypeInput| {
                format!("Build type for application \"{}\" saved successfully", i.application_id)
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-saveEnvironment",
                "Saves environment variables for an application in Dokploy.",
                write_hints("Save Application Environment", true, false),
            ),
            "/application.saveEnvironment",
            |i: &EnvironmentInput| {
                format!(
                    "Environment variables for application \"{}\" saved successfully",
                    i.application_id
                )
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-saveGithubProvider",
                "Saves GitHub provider configuration for an application in Dokploy.",
                write_hints("Save Application GitHub Provider", true, false),
            ),
            "/application.saveGithubProvider",
            |i: &GithubProviderInput| {
                format!("GitHub provider for application \"{}\" saved successfully", i.application_id)
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-saveGitlabProvider",
                "Saves GitLab provider configuration for an application in Dokploy.",
                write_hints("Save Application GitLab Provider", true, false),
            ),
            "/application.saveGitlabProvider",
            |i: &GitlabProviderInput| {
                format!("GitLab provider for application \"{}\" saved successfully", i.application_id)
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-saveBitbucketProvider",
                "Saves Bitbucket provider configuration for an application in Dokploy.",
                write_hints("Save Application Bitbucket Provider", true, false),
            ),
            "/application.saveBitbucketProvider",
            |i: &BitbucketProviderInput| {
                format!(
                    "Bitbucket provider for application \"{}\" saved successfully",
                    i.application_id
                )
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-saveGiteaProvider",
                "Saves Gitea provider configuration for an application in Dokploy.",
                write_hints("Save Application Gitea Provider", true, false),
            ),
            "/application.saveGiteaProvider",
            |i: &GiteaProviderInput| {
                format!("Gitea provider for application \"{}\" saved successfully", i.application_id)
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-saveGitProvider",
                "Saves Git provider configuration for an application in Dokploy.",
                write_hints("Save Application Git Provider", true, false),
            ),
            // Dokploy's router spells this procedure "Prodiver"
            "/application.saveGitProdiver",
            |i: &GitProviderInput| {
                format!("Git provider for application \"{}\" saved successfully", i.application_id)
            },
        )?,
        post_tool(
            api,
            ToolSpec::new(
                "application-saveDockerProvider",
                "Saves Docker provider configuration for an application in Dokploy.",
                write_hints("Save Application Docker Provider", true, false),
            ),
            "/application.saveDockerProvider",
            |i: &DockerProviderInput| {
                format!("Docker provider for application \"{}\" saved successfully", i.application_id)
            },
        )?,
    ])
}
