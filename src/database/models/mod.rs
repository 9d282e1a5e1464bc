pub mod level;
pub mod member_experience;
