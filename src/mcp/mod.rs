/// MCP protocol implementation
///
/// This module handles the Model Context Protocol communication:
/// JSON-RPC parsing, method dispatch, sessions and their push channels.

pub mod protocol;
pub mod server;
pub mod channel;
pub mod session;

// Re-export main types
pub use channel::{ChannelError, PushChannel, PushEvent, SessionChannel};
pub use server::{Dispatcher, McpServer};
pub use session::{new_session_id, Session, SessionError, SessionRegistry, SessionState, TransportKind};
