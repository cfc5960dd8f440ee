//! `[serve]` section configuration.
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 5278                 # HTTP port number
//! route = "/icons"            # URL prefix sprites are served under
//! watch = true                # Rebuild sprites on icon changes
//! ```

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,
    pub port: u16,
    pub route: String,
    pub watch: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5278,
            route: "/icons".into(),
            watch: true,
        }
    }
}

impl ServeConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.route.starts_with('/') {
            diag.error_with_hint(
                FieldPath::new("serve.route"),
                format!("route `{}` must start with `/`", self.route),
                format!("use route = \"/{}\"", self.route.trim_start_matches('/')),
            );
        }
        if self.port == 0 {
            diag.error(FieldPath::new("serve.port"), "port must not be 0");
        }
    }

    /// Route without a trailing slash (`/` becomes the empty prefix).
    pub fn route_prefix(&self) -> &str {
        self.route.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_serve_config() {
        let config = test_parse_config(
            "[serve]\ninterface = \"0.0.0.0\"\nport = 8080\nroute = \"/assets/icons\"\nwatch = false",
        );

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
        );
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.serve.route, "/assets/icons");
        assert!(!config.serve.watch);
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.serve.port, 5278);
        assert_eq!(config.serve.route, "/icons");
        assert!(config.serve.watch);
        assert_eq!(config.serve.route_prefix(), "/icons");
    }

    #[test]
    fn test_serve_ipv6_root_route() {
        let config = test_parse_config("[serve]\ninterface = \"::1\"\nroute = \"/\"");
        assert_eq!(
            config.serve.interface,
            IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
        assert_eq!(config.serve.route_prefix(), "");
    }

    #[test]
    fn test_serve_validation() {
        let config = test_parse_config("[serve]\nroute = \"icons\"\nport = 0");
        let mut diag = ConfigDiagnostics::new();
        config.serve.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
