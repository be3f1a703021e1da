/***************************************/
/*               Macros                */
/***************************************/
/// Unwraps a result or logs the error and exits the process. For fatal
/// bootstrap failures only; control loops propagate errors instead.
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                log::error!("ERROR: {}", e);
                std::process::exit(1);
            }
        }
    };
}
