use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

/// Almabody talking-avatar relay
#[derive(Debug, Parser)]
#[command(name = "almabody", about = "Turns short texts into talking-avatar videos")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "almabody.toml", env = "ALMABODY_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "ALMABODY_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Listen on all interfaces at this port, unless `--listen` is given
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Log filter directives
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_filter: String,
}

impl Args {
    /// Listen address requested on the command line, if any
    pub fn listen_address(&self) -> Option<SocketAddr> {
        self.listen
            .or_else(|| self.port.map(|port| SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)))
    }
}
