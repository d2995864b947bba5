//! Session and route identifiers attached to every outbound request.

// crates.io
use rand::Rng;
// self
use crate::_prelude::*;

/// Length of random tokens used for session prefixes and request ids.
pub const TOKEN_LEN: usize = 21;
/// Route id a fresh client starts from.
pub const INITIAL_ROUTE_ID: u64 = 1;

const TOKEN_ALPHABET: &[u8; 64] =
	b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Returns a URL-safe random token of `len` characters.
pub fn random_token(len: usize) -> String {
	let mut rng = rand::rng();

	(0..len).map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char).collect()
}

/// Per-client session identifier: a random token plus the creation time in epoch milliseconds.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);
impl SessionId {
	/// Generates a new session identifier.
	pub fn generate() -> Self {
		let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;

		Self(format!("{}-{millis}", random_token(TOKEN_LEN)))
	}

	/// Returns the identifier as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SessionId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Debug for SessionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "SessionId({})", self.0)
	}
}
impl Display for SessionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

#[derive(Debug)]
struct RouteState {
	last_route: String,
	route_id: u64,
}

/// Session id plus a route counter bumped whenever the observed navigation location changes.
///
/// Concurrent observers may race on a stale location; the route id is a diagnostic tag, so the
/// tracker only guarantees that each observation is applied atomically.
#[derive(Debug)]
pub struct Identity {
	session_id: SessionId,
	route: Mutex<RouteState>,
}
impl Identity {
	/// Creates an identity with a fresh session id and route id [`INITIAL_ROUTE_ID`].
	pub fn new() -> Self {
		Self::with_session(SessionId::generate())
	}

	/// Creates an identity around an existing session id.
	pub fn with_session(session_id: SessionId) -> Self {
		Self {
			session_id,
			route: Mutex::new(RouteState { last_route: String::new(), route_id: INITIAL_ROUTE_ID }),
		}
	}

	/// Session identifier, stable for the lifetime of this identity.
	pub fn session_id(&self) -> &SessionId {
		&self.session_id
	}

	/// Current route id without observing a new location.
	pub fn route_id(&self) -> u64 {
		self.route.lock().route_id
	}

	/// Records the current navigation location and returns the resulting route id.
	///
	/// The id increments once when a non-empty route differs from the last recorded one; empty
	/// or repeated routes leave it unchanged.
	pub fn observe_route(&self, route: Option<&str>) -> u64 {
		let mut state = self.route.lock();

		if let Some(route) = route.filter(|route| !route.is_empty() && *route != state.last_route) {
			state.last_route = route.to_owned();
			state.route_id += 1;
		}

		state.route_id
	}
}
impl Default for Identity {
	fn default() -> Self {
		Self::new()
	}
}
