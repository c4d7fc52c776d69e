mod auth_dto;

pub use auth_dto::{LoginFormDto, MeResponseDto, RegisterRequestDto};
