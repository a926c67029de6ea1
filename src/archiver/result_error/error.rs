use crate::archiver::result_error::{WithDebugObjectAndFnName, WithFunctionName, WithMsg};
use std::fmt::Debug;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    SevenZip(#[from] zesven::Error),
    #[error(transparent)]
    ValidationError(#[from] validator::ValidationErrors),
    #[error(transparent)]
    SerdeYml(#[from] serde_yml::Error),
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),
    #[error("Required setting {key:?} is not set at archive or preset level")]
    MissingRequiredSetting { key: &'static str },
    #[error("Unknown archival mode {mode:?}, expected one of \"7z\" or \"tar\"")]
    UnknownMode { mode: String },
    #[error("File {path:?} does not exist")]
    MissingFile { path: PathBuf },
    #[error("Invalid timestamp format {format:?}")]
    InvalidTimestampFormat { format: String },
    #[error("Cannot store {path:?} inside an archive")]
    InvalidArchivePath { path: PathBuf },
    #[error("No 7z executable (7zz, 7z, 7za) found on PATH")]
    ExternalArchiverNotFound,
    #[error("{program:?} exited with {status}")]
    ExternalArchiver { program: PathBuf, status: ExitStatus },
    #[error("{}:\n{}", msg, indent::indent_all_with("  ", error.to_string()))]
    WithMsg { msg: String, error: Box<Error> },
    #[error("{:?} {} failed:\n{}", obj_debug, fn_name, indent::indent_all_with("  ", error.to_string()))]
    WithDebugObjAndFnName {
        error: Box<Error>,
        obj_debug: Box<dyn Debug + Send>,
        fn_name: String,
    },
    #[error("{} failed:\n{}", fn_name, indent::indent_all_with("  ", error.to_string()))]
    WithFnName { error: Box<Error>, fn_name: String },
}

impl<S: Into<String>, O: Debug + Send + 'static> WithDebugObjectAndFnName<S, O> for Error {
    fn with_debug_object_and_fn_name(self, obj: O, fn_name: S) -> Self {
        Error::WithDebugObjAndFnName {
            error: Box::new(self),
            obj_debug: Box::new(obj),
            fn_name: fn_name.into(),
        }
    }
}

impl<S: Into<String>> WithMsg<S> for Error {
    fn with_msg(self, msg: S) -> Self {
        Self::WithMsg {
            msg: msg.into(),
            error: Box::new(self),
        }
    }
}

impl<S: Into<String>> WithFunctionName<S> for Error {
    fn with_fn_name(self, fn_name: S) -> Self {
        Self::WithFnName {
            error: Box::new(self),
            fn_name: fn_name.into(),
        }
    }
}

impl Error {
    /// Strips the context wrappers and returns the error that was first raised.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::WithMsg { error, .. }
            | Error::WithDebugObjAndFnName { error, .. }
            | Error::WithFnName { error, .. } => error.root_cause(),
            e => e,
        }
    }
}
