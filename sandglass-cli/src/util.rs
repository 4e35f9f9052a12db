/// Logs an error in the current span, and carries on.
pub fn emit<T>(r: eyre::Result<T>) -> Option<T> {
	match r {
		Ok(v) => Some(v),
		Err(e) => {
			tracing::error!("{e:#}");
			None
		}
	}
}

/// Parses an integer, in hex if prefixed with `0x`.
pub fn parse_int<T: TryFrom<u64>>(s: &str) -> Result<T, String> {
	let v = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
		Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
		None => s.replace('_', "").parse::<u64>(),
	}.map_err(|e| e.to_string())?;
	T::try_from(v).map_err(|_| format!("{v} is too large"))
}
