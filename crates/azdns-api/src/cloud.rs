// ── Azure cloud environments ──
//
// Endpoint presets for the global and sovereign clouds. Every URL the
// crate talks to flows through `Endpoints`, so tests (and exotic
// deployments) can point the whole client at a stand-in server.

use serde::Deserialize;
use url::Url;

// Instance-metadata service is link-local and identical across clouds.
const IMDS_ENDPOINT: &str = "http://169.254.169.254";

/// Well-known Azure cloud environments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AzureCloud {
    /// Global Azure.
    #[default]
    Public,
    /// Azure US Government.
    Government,
    /// Microsoft Azure operated by 21Vianet.
    China,
}

impl AzureCloud {
    /// Endpoint preset for this cloud.
    pub fn endpoints(self) -> Endpoints {
        let (management, authority) = match self {
            Self::Public => (
                "https://management.azure.com",
                "https://login.microsoftonline.com",
            ),
            Self::Government => (
                "https://management.usgovcloudapi.net",
                "https://login.microsoftonline.us",
            ),
            Self::China => (
                "https://management.chinacloudapi.cn",
                "https://login.chinacloudapi.cn",
            ),
        };
        Endpoints {
            management: Url::parse(management).expect("preset endpoint should be a valid URL"),
            authority: Url::parse(authority).expect("preset endpoint should be a valid URL"),
            imds: Url::parse(IMDS_ENDPOINT).expect("preset endpoint should be a valid URL"),
        }
    }
}

/// Service endpoints the crate exchanges requests with.
///
/// `management` hosts the DNS resource-manager API and doubles as the
/// token audience (`{management}/.default`), `authority` issues
/// service-principal tokens, `imds` serves managed-identity tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub management: Url,
    pub authority: Url,
    pub imds: Url,
}

impl Endpoints {
    /// OAuth2 scope for the management audience, e.g.
    /// `https://management.azure.com/.default`.
    pub fn management_scope(&self) -> String {
        format!("{}/.default", self.management.as_str().trim_end_matches('/'))
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        AzureCloud::Public.endpoints()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_cloud_is_the_default() {
        assert_eq!(AzureCloud::default(), AzureCloud::Public);
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.management.as_str(), "https://management.azure.com/");
        assert_eq!(
            endpoints.authority.as_str(),
            "https://login.microsoftonline.com/"
        );
    }

    #[test]
    fn sovereign_clouds_use_their_own_authority() {
        let gov = AzureCloud::Government.endpoints();
        assert_eq!(gov.authority.as_str(), "https://login.microsoftonline.us/");
        let china = AzureCloud::China.endpoints();
        assert_eq!(china.management.as_str(), "https://management.chinacloudapi.cn/");
    }

    #[test]
    fn imds_is_link_local_everywhere() {
        for cloud in [AzureCloud::Public, AzureCloud::Government, AzureCloud::China] {
            assert_eq!(cloud.endpoints().imds.as_str(), "http://169.254.169.254/");
        }
    }

    #[test]
    fn management_scope_has_no_double_slash() {
        assert_eq!(
            Endpoints::default().management_scope(),
            "https://management.azure.com/.default"
        );
    }

    #[test]
    fn cloud_names_deserialize_lowercase() {
        let cloud: AzureCloud = serde_json::from_str("\"government\"").expect("valid cloud name");
        assert_eq!(cloud, AzureCloud::Government);
    }
}
