pub mod assemble;
pub mod callback_check;
pub mod config_check;
