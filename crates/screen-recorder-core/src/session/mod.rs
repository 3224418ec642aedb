mod capture_session;
mod chunk_buffer;
mod session_event;
mod session_state;

pub use {
    capture_session::CaptureSession, chunk_buffer::ChunkBuffer, session_event::SessionEvent,
    session_state::SessionState,
};
