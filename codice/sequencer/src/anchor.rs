use std::fmt;

/// Named regions of the stage a marker can travel between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnchorId {
    Client,
    Server,
    Thread(usize),
    ProxyClient,
    Proxy,
    MainServer,
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorId::Client => write!(f, "client-box"),
            AnchorId::Server => write!(f, "server-box"),
            AnchorId::Thread(index) => write!(f, "thread-box[{index}]"),
            AnchorId::ProxyClient => write!(f, "proxy-client"),
            AnchorId::Proxy => write!(f, "proxy-box"),
            AnchorId::MainServer => write!(f, "main-server"),
        }
    }
}

/// How a waypoint picks the anchor it is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSelector {
    Fixed(AnchorId),
    /// The thread anchor under the round-robin cursor. Resolving it advances the cursor.
    NextThread,
}

impl From<AnchorId> for AnchorSelector {
    fn from(anchor: AnchorId) -> Self {
        AnchorSelector::Fixed(anchor)
    }
}
