pub mod auth_handler;

pub use auth_handler::{
    __path_get_me, __path_register, get_me, login_page, login_submit, logout, register,
};
