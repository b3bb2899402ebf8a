pub mod cloudinary;
pub mod validation;
