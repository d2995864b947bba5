//! Request construction, signing, dispatch, and response normalization.
//!
//! [`Client`] owns the configuration and identity state that the JSON-RPC endpoint expects on
//! every call. A call runs in a fixed order: precondition check, route refresh, envelope, URL,
//! headers (caller, JWT, signature), body encoding, dispatch, normalization. The envelope is
//! serialized once and that string is both signed and sent, so the signature can never drift
//! from the body.

// self
use crate::{
	_prelude::*,
	codec,
	config::ClientConfig,
	error::ConfigError,
	http::{METHOD_POST, RpcTransport, TransportRequest},
	identity::{Identity, SessionId},
	nav::Navigator,
	obs::{self, RequestOutcome, RequestSpan},
	rpc::{RpcRequest, RpcResponse},
	sign::Signer,
	store::{self, JWT_KEY, KeyValueStore, SHARE_MID_KEY, TRAFFIC_SOURCE_KEY},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Endpoint path appended to the base URL; the query string follows after a second `?`.
pub const RPC_ENDPOINT: &str = "/api/json-rpc?i=1";
/// Timeout applied when neither the request nor the config sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(10);
/// Content type declared on every request, including base64-encoded ones.
pub const JSON_CONTENT_TYPE: &str = "application/json";

const HEADER_CONTENT_TYPE: &str = "Content-Type";
const HEADER_AUTHORIZATION: &str = "Authorization";
const HEADER_JWT: &str = "JWT";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestRpcClient = Client<ReqwestTransport>;

/// Per-call options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Attaches the stored JWT, if any.
	pub with_jwt: bool,
	/// Overrides the configured timeout for this call.
	pub timeout: Option<Duration>,
	/// Extra headers; they override `Content-Type` but not JWT or signature headers.
	pub headers: BTreeMap<String, String>,
}
impl RequestOptions {
	/// Creates empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Attaches the stored JWT to this call.
	pub fn with_jwt(mut self) -> Self {
		self.with_jwt = true;

		self
	}

	/// Overrides the timeout for this call.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Adds or replaces a header for this call.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}
}

/// Signed JSON-RPC client bound to one transport, storage backend, and navigator.
///
/// Share it by reference (typically `Arc<Client<_>>`); calls are independent and only touch the
/// shared state through brief synchronous reads of the config and the route counter.
pub struct Client<T>
where
	T: ?Sized + RpcTransport,
{
	/// Transport used for every outbound call.
	pub transport: Arc<T>,
	/// Host storage holding the JWT and contextual identifiers.
	pub storage: Arc<dyn KeyValueStore>,
	/// Host navigation stack used for route tagging.
	pub navigator: Arc<dyn Navigator>,
	config: RwLock<Option<ClientConfig>>,
	identity: Identity,
}
impl<T> Client<T>
where
	T: ?Sized + RpcTransport,
{
	/// Creates an uninitialized client over the caller-provided transport.
	pub fn with_transport(
		transport: impl Into<Arc<T>>,
		storage: Arc<dyn KeyValueStore>,
		navigator: Arc<dyn Navigator>,
	) -> Self {
		Self {
			transport: transport.into(),
			storage,
			navigator,
			config: RwLock::new(None),
			identity: Identity::new(),
		}
	}

	/// Installs `config` and refreshes the route id from the current navigation location.
	pub fn init(&self, config: ClientConfig) {
		*self.config.write() = Some(config);

		self.refresh_route();
	}

	/// Replaces the base URL. Returns `false` (and does nothing) before [`Client::init`].
	pub fn set_base_url(&self, url: impl Into<String>) -> bool {
		match self.config.write().as_mut() {
			Some(config) => {
				config.base_url = url.into();

				true
			},
			None => false,
		}
	}

	/// Snapshot of the installed configuration.
	pub fn config(&self) -> Option<ClientConfig> {
		self.config.read().clone()
	}

	/// Session identifier sent as `__sessionId`.
	pub fn session_id(&self) -> &SessionId {
		self.identity.session_id()
	}

	/// Route identifier as of the last observation.
	pub fn route_id(&self) -> u64 {
		self.identity.route_id()
	}

	/// Calls `method` with `params` and default options.
	///
	/// This is the `(method, params) -> result` function a caching layer keys on; it has no side
	/// effects besides the network call and the route refresh.
	pub async fn call<R, P>(&self, method: &str, params: P) -> Result<R>
	where
		R: DeserializeOwned,
		P: Serialize,
	{
		self.request(method, params, RequestOptions::default()).await
	}

	/// Calls `method` with `params` and per-call `options`.
	pub async fn request<R, P>(&self, method: &str, params: P, options: RequestOptions) -> Result<R>
	where
		R: DeserializeOwned,
		P: Serialize,
	{
		let span = RequestSpan::new(method);

		obs::record_request_outcome(RequestOutcome::Attempt, None);

		let result = span
			.instrument(async {
				let (request, use_base64) = self.prepare(method, params, &options)?;

				span.record_route_id(self.identity.route_id());

				let response = self.transport.send(request).await?;

				RpcResponse::from_value(response.data)?.into_result(use_base64)
			})
			.await;

		match &result {
			Ok(_) => obs::record_request_outcome(RequestOutcome::Success, None),
			Err(e) => obs::record_request_outcome(RequestOutcome::Failure, Some(e.class())),
		}

		result
	}

	/// Builds the outbound request for `method` without dispatching it.
	///
	/// Returns the request together with the resolved `use_base64` flag the response must be
	/// decoded with.
	pub fn prepare<P>(
		&self,
		method: &str,
		params: P,
		options: &RequestOptions,
	) -> Result<(TransportRequest, bool)>
	where
		P: Serialize,
	{
		let config = self.current_config()?;
		let route_id = self.refresh_route();
		let params = serde_json::to_value(params).map_err(|source| Error::Encode { source })?;
		let envelope = RpcRequest::new(method, params);
		let url = self.build_url(&config, method, route_id);
		let payload = envelope.to_json()?;
		let mut headers: BTreeMap<String, String> =
			BTreeMap::from([(HEADER_CONTENT_TYPE.into(), JSON_CONTENT_TYPE.into())]);

		headers.extend(options.headers.iter().map(|(k, v)| (k.to_owned(), v.to_owned())));

		if options.with_jwt {
			self.attach_jwt(&config, &mut headers);
		}
		if let Some(signer) = Signer::from_config(&config) {
			signer.sign_now(&payload).apply(&mut headers);
		}

		let body = if config.use_base64 { codec::encode(&payload) } else { payload };
		let timeout = options.timeout.or(config.timeout).unwrap_or(DEFAULT_TIMEOUT);

		Ok((TransportRequest { url, method: METHOD_POST, body, headers, timeout }, config.use_base64))
	}

	fn current_config(&self) -> Result<ClientConfig> {
		self.config
			.read()
			.as_ref()
			.filter(|config| !config.base_url.is_empty())
			.cloned()
			.ok_or_else(|| ConfigError::NotInitialized.into())
	}

	fn refresh_route(&self) -> u64 {
		let route = self.navigator.current_route();

		self.identity.observe_route(route.as_deref())
	}

	/// `<base>/api/json-rpc?i=1?<query>`, query keys sorted and each present at most once.
	///
	/// Values are percent-encoded byte-wise; only `A-Za-z0-9-_.~` pass through raw.
	fn build_url(&self, config: &ClientConfig, method: &str, route_id: u64) -> String {
		let mut query = BTreeMap::from([
			("___method", method.to_owned()),
			("__sessionId", self.identity.session_id().to_string()),
			("__routeId", route_id.to_string()),
		]);

		if let Some(mid) = store::lookup(self.storage.as_ref(), SHARE_MID_KEY) {
			query.insert("__mid", mid);
		}
		if let Some(source) = store::lookup(self.storage.as_ref(), TRAFFIC_SOURCE_KEY) {
			query.insert("__ts", source);
		}

		let encoded = query
			.iter()
			.map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
			.collect::<Vec<_>>()
			.join("&");

		format!("{}{RPC_ENDPOINT}?{encoded}", config.endpoint_base())
	}

	fn attach_jwt(&self, config: &ClientConfig, headers: &mut BTreeMap<String, String>) {
		let Some(token) = store::lookup(self.storage.as_ref(), JWT_KEY) else {
			return;
		};

		if config.use_authorization {
			headers.insert(HEADER_AUTHORIZATION.into(), format!("Bearer {token}"));
		} else {
			headers.insert(HEADER_JWT.into(), token);
		}
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates an uninitialized client backed by a default reqwest transport.
	pub fn new(storage: Arc<dyn KeyValueStore>, navigator: Arc<dyn Navigator>) -> Self {
		Self::with_transport(ReqwestTransport::default(), storage, navigator)
	}
}
impl<T> Debug for Client<T>
where
	T: ?Sized + RpcTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("config", &*self.config.read())
			.field("identity", &self.identity)
			.finish()
	}
}
