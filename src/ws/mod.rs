pub mod handler;
pub mod msg_ping_handler;
pub mod msg_room_handler;
pub mod msg_signal_handler;
