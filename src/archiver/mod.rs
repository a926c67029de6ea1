pub mod backend;
pub mod compress;
pub mod context;
pub mod file_ext;
pub mod finish;
pub mod job;
pub mod path_resolver;
pub mod preset;
pub mod processor;
pub mod redacted;
pub mod result_error;
pub mod setting;
pub mod source;
pub mod validate;

macro_rules! function_path {
    () => {
        concat!(module_path!(), "::", function_name!(), " ", file!(), ":", line!())
    };
}

pub(crate) use function_path;
