/// The deployment style of the UniFi controller.
///
/// Determines the login path and the prefix placed in front of the
/// Network application's API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerPlatform {
    /// UniFi OS device (UDM, UDM Pro, UCG) -- `/proxy/network/` prefix.
    #[default]
    UnifiOs,
    /// Standalone Network Application (Java) -- no prefix.
    ClassicController,
}

impl ControllerPlatform {
    /// The path prefix for Network application endpoints.
    ///
    /// On UniFi OS: `/proxy/network`
    /// On standalone: empty
    pub fn network_prefix(self) -> &'static str {
        match self {
            Self::UnifiOs => "/proxy/network",
            Self::ClassicController => "",
        }
    }

    /// The login endpoint path.
    ///
    /// - UniFi OS: `POST /api/auth/login`
    /// - Standalone: `POST /api/login`
    pub fn login_path(self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/login",
            Self::ClassicController => "/api/login",
        }
    }
}
