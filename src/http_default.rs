//! Default request builder & sender implemented on top of `attohttpc`.

use attohttpc::{
    header::HeaderName, RequestBuilder as AttoHttpRequestBuilder, Response as AttoHttpResponse,
};
use eyre::{eyre, Error, Result, WrapErr};

use crate::http::{Headers, Method, RequestBuilder, Response};

type Bytes = Vec<u8>;

/// Default [`RequestBuilder`] over `attohttpc`. Parts are collected first
/// and only turned into a transport request inside [`Self::send`], so
/// header parsing errors surface there rather than mid-chain.
pub struct DefaultRequestBuilder {
    method: Method,
    url: String,
    headers: Headers,
    body: Bytes,
}

impl DefaultRequestBuilder {
    /// Issues the request and blocks until the node answers or the
    /// transport gives up.
    ///
    /// # Errors
    /// Fails if a header name is malformed, if the connection cannot be
    /// established, or if the response cannot be read back in full.
    pub fn send(self) -> Result<Response<Bytes>> {
        let Self {
            method,
            url,
            headers,
            body,
        } = self;

        let mut builder = AttoHttpRequestBuilder::new(method.clone(), url.as_str()).bytes(body);
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_ref())
                .wrap_err_with(|| format!("Failed to parse header name {name}"))?;
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .wrap_err_with(|| format!("Failed to send http {method} request to {url}"))?;

        ClientResponse(response).try_into()
    }
}

impl RequestBuilder for DefaultRequestBuilder {
    fn new<U>(method: Method, url: U) -> Self
    where
        U: AsRef<str>,
    {
        Self {
            method,
            url: url.as_ref().to_owned(),
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    fn headers(mut self, headers: Headers) -> Self {
        self.headers.extend(headers);
        self
    }

    fn body(mut self, data: Bytes) -> Self {
        self.body = data;
        self
    }
}

struct ClientResponse(AttoHttpResponse);

impl TryFrom<ClientResponse> for Response<Bytes> {
    type Error = Error;

    fn try_from(response: ClientResponse) -> Result<Self> {
        let ClientResponse(response) = response;
        let mut builder = Response::builder().status(response.status());
        let headers = builder
            .headers_mut()
            .ok_or_else(|| eyre!("Failed to get headers map reference."))?;
        for (key, value) in response.headers() {
            headers.insert(key, value.clone());
        }
        response
            .bytes()
            .wrap_err("Failed to get response as bytes")
            .and_then(|bytes| {
                builder
                    .body(bytes)
                    .wrap_err("Failed to construct response bytes body")
            })
    }
}
