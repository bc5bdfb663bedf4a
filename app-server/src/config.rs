use std::{net::SocketAddr, time::Duration};

use clap::{Parser, ValueEnum};
use common::port::ChannelPair;
use responder::Timing;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "app-server", about = "HTTP app that reads its users through the DB ports")]
pub struct Config {
    /// HTTP listen port
    #[arg(long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    /// Port pair used for DB requests
    #[arg(long, value_enum, default_value_t = Channel::Data)]
    pub channel: Channel,

    /// When the host answers
    #[arg(long, value_enum, default_value_t = TimingMode::Delayed)]
    pub timing: TimingMode,

    /// How long to wait for the host before giving up on a request
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Channel {
    /// getDbUsers / gotDbUsers
    Users,
    /// getDbData / gotDbData
    Data,
}

impl From<Channel> for ChannelPair {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Users => ChannelPair::Users,
            Channel::Data => ChannelPair::Data,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TimingMode {
    Immediate,
    Delayed,
}

impl From<TimingMode> for Timing {
    fn from(mode: TimingMode) -> Self {
        match mode {
            TimingMode::Immediate => Timing::Immediate,
            TimingMode::Delayed => Timing::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use responder::DEFAULT_DELAY;

    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["app-server", "--port", "4000"]).unwrap();
        assert_eq!(config.channel, Channel::Data);
        assert_eq!(Timing::from(config.timing), Timing::Delayed(DEFAULT_DELAY));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.addr(), SocketAddr::from(([127, 0, 0, 1], 4000)));
        assert!(!config.verbose);
    }

    #[test]
    fn flags() {
        let config = Config::try_parse_from([
            "app-server",
            "--port",
            "4100",
            "--channel",
            "users",
            "--timing",
            "immediate",
            "--timeout-ms",
            "250",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 4100);
        assert_eq!(ChannelPair::from(config.channel), ChannelPair::Users);
        assert_eq!(Timing::from(config.timing), Timing::Immediate);
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert!(config.verbose);
    }

    #[test]
    fn rejects_unknown_channel() {
        assert!(Config::try_parse_from(["app-server", "--channel", "fromJS"]).is_err());
    }
}
