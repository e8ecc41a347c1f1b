/// Emit a debug event named `name`, optionally followed by `key = value` fields.
///
/// With `internal-logs` the event goes to `tracing` under this crate's target.
/// Test builds also print it to stdout (visible with `--nocapture`). Field
/// values must be `Display` and a `tracing` primitive (`&str`, integers).
///
/// Never pass the private key, the signed assertion or the access token.
macro_rules! cloudmon_debug {
    (name: $name:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        #[cfg(feature = "internal-logs")]
        tracing::debug!(name: $name, target: env!("CARGO_PKG_NAME"), name = $name $(, $key = $value)*);

        #[cfg(test)]
        {
            let line = format!("cloudmon_debug: name={}", $name)
                $(+ &format!(", {}={}", stringify!($key), $value))*;
            println!("{line}");
        }

        #[cfg(all(not(feature = "internal-logs"), not(test)))]
        let _ = ($name, $($value,)*);
    }};
}

pub(crate) use cloudmon_debug;
