use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::{BrokerError, CandleClient, CandleRequest, CandleResponse, ClientError};
use crate::config::{ClientConfig, Credentials};
use crate::domain::CandleRow;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::session::{Session, SessionProvider};

pub const LOGIN_PATH: &str = "/rest/auth/angelbroking/user/v1/loginByPassword";
pub const CANDLE_PATH: &str = "/rest/secure/angelbroking/historical/v1/getCandleData";

/// Envelope wrapping every SmartAPI response body.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    errorcode: String,
    data: Option<T>,
}

#[derive(Debug, Serialize)]
struct LoginPayload<'a> {
    clientcode: &'a str,
    password: &'a str,
    totp: String,
}

/// Headers and endpoints shared by the login and candle calls.
#[derive(Clone)]
struct Transport {
    http_client: Arc<dyn HttpClient>,
    config: ClientConfig,
}

impl Transport {
    fn request<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<HttpRequest, ClientError> {
        let config = &self.config;
        Ok(HttpRequest::post_json(config.endpoint(path), payload)?
            .with_header("X-UserType", "USER")
            .with_header("X-SourceID", "WEB")
            .with_header("X-ClientLocalIP", &config.client_local_ip)
            .with_header("X-ClientPublicIP", &config.client_public_ip)
            .with_header("X-MACAddress", &config.mac_address)
            .with_header("X-PrivateKey", &config.api_key)
            .with_timeout_ms(config.timeout_ms))
    }

    async fn call<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<Option<T>, ClientError> {
        debug!(url = %request.url, "dispatching smartapi request");
        let response = self.http_client.execute(request).await?;
        debug!(status = response.status, "smartapi responded");
        decode_envelope(response)
    }
}

fn decode_envelope<T: DeserializeOwned>(response: HttpResponse) -> Result<Option<T>, ClientError> {
    match serde_json::from_str::<ApiEnvelope<T>>(&response.body) {
        Ok(envelope) if !envelope.status => {
            Err(BrokerError::new(envelope.errorcode, envelope.message).into())
        }
        Ok(_) | Err(_) if !response.is_success() => Err(ClientError::HttpStatus {
            status: response.status,
        }),
        Ok(envelope) => Ok(envelope.data),
        Err(error) => Err(ClientError::Decode(error)),
    }
}

/// Logs in against SmartAPI and hands out authenticated candle clients.
#[derive(Clone)]
pub struct SmartApiGateway {
    transport: Transport,
}

impl SmartApiGateway {
    pub fn new(http_client: Arc<dyn HttpClient>, config: ClientConfig) -> Self {
        Self {
            transport: Transport {
                http_client,
                config,
            },
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.transport.config
    }

    /// Bind `session` to a client sharing this gateway's transport.
    pub fn client(&self, session: Session) -> SmartApiClient {
        SmartApiClient {
            transport: self.transport.clone(),
            session,
        }
    }
}

impl SessionProvider for SmartApiGateway {
    fn login<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> Pin<Box<dyn Future<Output = Result<Session, ClientError>> + Send + 'a>> {
        Box::pin(async move {
            let payload = LoginPayload {
                clientcode: &credentials.client_code,
                password: &credentials.pin,
                totp: credentials.totp.current(),
            };
            let request = self.transport.request(LOGIN_PATH, &payload)?;

            let session = self
                .transport
                .call::<Session>(request)
                .await?
                .ok_or_else(|| BrokerError::new("", "login succeeded without session tokens"))?;

            info!(client_code = %credentials.client_code, "smartapi session established");
            Ok(session)
        })
    }
}

/// Authenticated historical-candle client.
#[derive(Clone)]
pub struct SmartApiClient {
    transport: Transport,
    session: Session,
}

impl SmartApiClient {
    pub fn new(http_client: Arc<dyn HttpClient>, config: ClientConfig, session: Session) -> Self {
        SmartApiGateway::new(http_client, config).client(session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl CandleClient for SmartApiClient {
    fn get_candles<'a>(
        &'a self,
        request: &'a CandleRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CandleResponse, ClientError>> + Send + 'a>> {
        Box::pin(async move {
            let http_request = self
                .transport
                .request(CANDLE_PATH, request)?
                .with_bearer(self.session.access_token());

            let data = self.transport.call::<Vec<CandleRow>>(http_request).await?;
            Ok(CandleResponse { data })
        })
    }
}
