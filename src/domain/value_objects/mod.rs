mod bucket_name;
mod image_format;
mod object_key;
mod product_id;
mod product_image;

pub use bucket_name::BucketName;
pub use image_format::{is_recognized_image, ImageFormat};
pub use object_key::ObjectKey;
pub use product_id::ProductId;
pub use product_image::ProductImage;
