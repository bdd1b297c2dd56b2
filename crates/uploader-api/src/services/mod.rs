pub mod image_lifecycle;
