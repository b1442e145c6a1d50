//! Hotmart API response type definitions.

use serde::Deserialize;

/// OAuth token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// `check_token` response: the purchased resources for an account.
#[derive(Debug, Deserialize)]
pub struct CheckTokenResponse {
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceEntry {
    pub resource: ResourceInfo,
}

#[derive(Debug, Deserialize)]
pub struct ResourceInfo {
    pub subdomain: String,
}

/// Membership lookup response (course display name).
#[derive(Debug, Deserialize)]
pub struct MembershipResponse {
    pub name: String,
}

/// A purchased course, addressed by its club subdomain.
#[derive(Debug, Clone)]
pub struct Course {
    pub name: String,
    pub subdomain: String,
}

impl Course {
    /// Public homepage of the course's club.
    pub fn homepage(&self) -> String {
        format!("https://{}.club.hotmart.com", self.subdomain)
    }
}

/// Navigation response: the module/page tree of one course.
#[derive(Debug, Deserialize)]
pub struct NavigationResponse {
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// One course module.
#[derive(Debug, Clone, Deserialize)]
pub struct Module {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pages: Vec<PageRef>,
}

/// A page (lesson) reference inside a module.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRef {
    pub hash: String,
    pub name: String,
}

/// Full page detail: media sources and attachments.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetail {
    #[serde(default)]
    pub medias_src: Vec<MediaSource>,
    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
}

/// One media source: a URL pointing at the embedded player page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSource {
    pub media_src_url: String,
}

/// One downloadable attachment reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub file_membership_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Attachment download endpoint response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDownload {
    pub direct_download_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_deserialization() {
        let json = r#"{
            "modules": [
                {
                    "id": "m1",
                    "name": "Module One",
                    "pages": [
                        {"hash": "abc123", "name": "Lesson 1"},
                        {"hash": "def456", "name": "Lesson 2"}
                    ]
                }
            ]
        }"#;

        let nav: NavigationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(nav.modules.len(), 1);
        assert_eq!(nav.modules[0].pages[1].hash, "def456");
    }

    #[test]
    fn test_page_detail_deserialization() {
        let json = r#"{
            "mediasSrc": [{"mediaSrcUrl": "https://player/embed/x"}],
            "attachments": [{"fileMembershipId": "f1", "fileName": "notes.pdf"}]
        }"#;

        let page: PageDetail = serde_json::from_str(json).unwrap();
        assert_eq!(page.medias_src[0].media_src_url, "https://player/embed/x");
        assert_eq!(page.attachments[0].file_name.as_deref(), Some("notes.pdf"));
    }

    #[test]
    fn test_page_detail_fields_are_optional() {
        let page: PageDetail = serde_json::from_str("{}").unwrap();
        assert!(page.medias_src.is_empty());
        assert!(page.attachments.is_empty());
    }
}
