pub mod debug_token;
