use core::fmt;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataLinkAddress {
    Ip(SocketAddr),
}

impl DataLinkAddress {
    /// Standard BACnet/IP port for the remote device.
    pub const BACNET_IP_DEFAULT_PORT: u16 = 47808;

    /// Conventional port for a second BACnet/IP stack on the same host.
    pub const BACNET_IP_ALTERNATE_PORT: u16 = 47809;

    pub fn bacnet_default(addr: IpAddr) -> Self {
        Self::Ip(SocketAddr::new(addr, Self::BACNET_IP_DEFAULT_PORT))
    }

    pub fn as_socket_addr(self) -> SocketAddr {
        match self {
            Self::Ip(addr) => addr,
        }
    }
}

impl fmt::Display for DataLinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(addr) => write!(f, "{addr}"),
        }
    }
}
