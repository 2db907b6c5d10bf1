use core::fmt;
use core::str::FromStr;

/// Environment variable set by CAD host plugins that embed the dashboard.
pub const HOST_ENV: &str = "POLLINATION_HOST";

/// The environment the dashboard runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Host {
    /// Inside the Rhino plugin, which accepts preview and bake messages.
    Rhino,
    /// Standalone browser page.
    #[default]
    Web,
}

impl Host {
    /// Probe the runtime once. Call at startup and pass the result along.
    pub fn detect() -> Self {
        let host = std::env::var(HOST_ENV)
            .ok()
            .map(|raw| Self::from_name(&raw))
            .unwrap_or_default();
        tracing::debug!(host = %host, "detected host");
        host
    }

    /// Unrecognised names fall back to the standalone page.
    pub fn from_name(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rhino" => Host::Rhino,
            _ => Host::Web,
        }
    }

    pub fn is_cad_plugin(self) -> bool {
        matches!(self, Host::Rhino)
    }
}

impl FromStr for Host {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rhino" => Ok(Host::Rhino),
            "web" => Ok(Host::Web),
            other => Err(format!("unknown host '{}' (expected rhino or web)", other)),
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Rhino => f.write_str("rhino"),
            Host::Web => f.write_str("web"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(Host::from_name("Rhino"), Host::Rhino);
        assert_eq!(Host::from_name("sketchup"), Host::Web);
        assert_eq!("web".parse::<Host>().unwrap(), Host::Web);
        assert!("revit".parse::<Host>().is_err());
        assert!(Host::Rhino.is_cad_plugin());
    }
}
