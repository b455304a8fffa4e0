use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateProjectForm {
    #[serde(default)]
    pub name: String,
}
