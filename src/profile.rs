use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The static profile document rendered into every persona prompt.
/// Loaded once at startup and read-only thereafter.
///
/// Every field defaults so a sparse document still deserializes; absent
/// sections simply render as empty strings in the prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDocument {
    pub basics: Basics,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub faq: Vec<Faq>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Basics {
    pub name: String,
    pub title: String,
    pub summary: String,
    pub location: String,
    pub website: String,
    pub profiles: Vec<ProfileLink>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileLink {
    pub network: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub name: String,
    pub level: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub company: String,
    pub position: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    pub summary: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub institution: String,
    pub area: String,
    #[serde(rename = "studyType")]
    pub study_type: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

impl ProfileDocument {
    /// Greeting seeded as the first assistant turn of every new conversation.
    pub fn welcome_message(&self) -> String {
        format!(
            "Hi! I'm {}. Nice to meet you. Ask me about my projects, my experience, \
             or anything else. How can I help?",
            self.basics.name
        )
    }
}

/// Load the profile document from disk, substituting a placeholder when the
/// file is missing or malformed. The process still starts either way; a
/// placeholder just means every rendered prompt reflects placeholder content.
pub fn load(path: &str) -> ProfileDocument {
    match try_load(path) {
        Ok(profile) => {
            info!(path, name = %profile.basics.name, "loaded profile document");
            profile
        }
        Err(e) => {
            warn!(path, "failed to load profile document, using placeholder: {e}");
            placeholder()
        }
    }
}

fn try_load(path: &str) -> anyhow::Result<ProfileDocument> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {path}: {e}"))?;
    let profile: ProfileDocument = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("invalid profile document at {path}: {e}"))?;
    Ok(profile)
}

/// Minimal stand-in document used when the real one cannot be loaded.
pub fn placeholder() -> ProfileDocument {
    ProfileDocument {
        basics: Basics {
            name: "Portfolio Owner".into(),
            title: "Software Developer".into(),
            summary: "A passionate developer with experience in multiple technologies.".into(),
            ..Basics::default()
        },
        ..ProfileDocument::default()
    }
}
