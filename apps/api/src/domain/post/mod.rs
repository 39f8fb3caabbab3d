// Post domain module
// Posts plus the comments and likes that hang off them

#![allow(clippy::module_inception)]

pub mod comment;
pub mod like;
pub mod post;
pub mod value_objects;

pub use comment::Comment;
pub use like::Like;
pub use post::Post;
pub use value_objects::{MyPostFilter, VaccinationType};
