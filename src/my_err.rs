use std::{
	error,
	string,
	fmt
};
use fltk::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum MyError {
	Decode { msg: String },
	UnknownFilter { name: String },
	IndexOutOfRange { index: usize, len: usize },
	InvalidSetting { setting: &'static str, msg: String },
	InvalidFilterParam { filter: String, param: String, msg: String },
	FilterExecution { name: String, index: usize, msg: String },
	StaleBuffer,
	RecomputeInFlight,
	Halted,
	Format { msg: String },
	Io { msg: String },
	Asset { msg: String },
	Custom { msg: String },
}

impl fmt::Display for MyError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.get_message())
	}
}

impl error::Error for MyError { }

impl MyError {
	pub fn new(msg: String) -> Self {
		MyError::Custom { msg }
	}

	pub fn decode(msg: String) -> Self {
		MyError::Decode { msg }
	}

	pub fn format(msg: String) -> Self {
		MyError::Format { msg }
	}

	pub fn invalid_setting(setting: &'static str, msg: String) -> Self {
		MyError::InvalidSetting { setting, msg }
	}

	pub fn get_message(&self) -> String {
		match self {
			MyError::Decode { msg } => format!("Couldn't decode image: {}", msg),
			MyError::UnknownFilter { name } => format!("Unknown filter '{}'", name),
			MyError::IndexOutOfRange { index, len } =>
				format!("Step index {} is out of range, the chain has {} steps", index, len),
			MyError::InvalidSetting { setting, msg } => format!("Invalid {}: {}", setting, msg),
			MyError::InvalidFilterParam { filter, param, msg } =>
				format!("Invalid parameter '{}' of filter '{}': {}", param, filter, msg),
			MyError::FilterExecution { name, index, msg } =>
				format!("Filter '{}' (step {}) failed: {}", name, index, msg),
			MyError::StaleBuffer => "Display buffer is stale, recompute it first".to_string(),
			MyError::RecomputeInFlight => "A recompute is already running for this subwindow".to_string(),
			MyError::Halted => "Processing was halted".to_string(),
			MyError::Format { msg } => format!("Project format error: {}", msg),
			MyError::Io { msg } => format!("I/O error: {}", msg),
			MyError::Asset { msg } => format!("Embedded asset error: {}", msg),
			MyError::Custom { msg } => msg.clone(),
		}
	}
}

impl From<string::FromUtf8Error> for MyError {
	fn from(err: string::FromUtf8Error) -> Self {
		MyError::Format {
			msg: err.to_string()
		}
	}
}

impl From<std::io::Error> for MyError {
	fn from(err: std::io::Error) -> Self {
		MyError::Io {
			msg: err.to_string()
		}
	}
}

impl From<FltkError> for MyError {
	fn from(err: FltkError) -> Self {
		MyError::Custom {
			msg: err.to_string()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::MyError;

	#[test]
	fn messages_name_the_failing_step() {
		let err = MyError::FilterExecution { name: "Notch".to_string(), index: 2, msg: "boom".to_string() };
		let msg = err.to_string();
		assert!(msg.contains("Notch"));
		assert!(msg.contains("step 2"));
	}

	#[test]
	fn io_errors_convert() {
		let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
		match MyError::from(io) {
			MyError::Io { msg } => assert!(msg.contains("no such file")),
			other => panic!("unexpected {:?}", other),
		}
	}
}
