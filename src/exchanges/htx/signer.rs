//! HTX request signing (signature version 2)
//!
//! The signed string is
//!
//! ```text
//! {METHOD}\n{host}\n{path}\n{sorted, url-encoded query}
//! ```
//!
//! and the base64 HMAC-SHA256 of it is appended to the query as `Signature`.
//! POST parameters travel in the JSON body and are not part of the query.

use std::collections::{BTreeMap, HashMap};

use crate::errors::{CcxtError, CcxtResult};
use crate::utils::crypto::hmac_sha256_base64;

pub const SIGNATURE_METHOD: &str = "HmacSHA256";
pub const SIGNATURE_VERSION: &str = "2";

/// API key pair used to sign private requests
#[derive(Debug, Clone, Copy)]
pub struct Signer<'a> {
    api_key: &'a str,
    secret: &'a str,
}

impl<'a> Signer<'a> {
    pub fn new(api_key: &'a str, secret: &'a str) -> Self {
        Self { api_key, secret }
    }

    /// Builds the full query string, `Signature` included.
    ///
    /// `params` are the GET parameters of the call; pass an empty map for POST.
    pub fn signed_query(
        &self,
        method: &str,
        host: &str,
        path: &str,
        params: &HashMap<String, String>,
        timestamp: &str,
    ) -> CcxtResult<String> {
        let mut sorted: BTreeMap<&str, &str> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        sorted.insert("AccessKeyId", self.api_key);
        sorted.insert("SignatureMethod", SIGNATURE_METHOD);
        sorted.insert("SignatureVersion", SIGNATURE_VERSION);
        sorted.insert("Timestamp", timestamp);

        let query = encode_query(&sorted);
        let payload = format!(
            "{}\n{}\n{}\n{}",
            method.to_ascii_uppercase(),
            host.to_ascii_lowercase(),
            path,
            query
        );
        let signature = hmac_sha256_base64(self.secret, &payload)?;

        Ok(format!(
            "{query}&Signature={}",
            urlencoding::encode(&signature)
        ))
    }
}

/// `k=v&k=v` in key order, RFC 3986 encoded
pub fn encode_query<K, V>(params: &BTreeMap<K, V>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Host part of the signed string: lower-cased, with the port when it is not
/// the scheme default.
pub fn signing_host(base_url: &str) -> CcxtResult<String> {
    let url = reqwest::Url::parse(base_url).map_err(|e| CcxtError::BadRequest {
        message: format!("invalid base url {base_url}: {e}"),
    })?;
    let host = url
        .host_str()
        .ok_or_else(|| CcxtError::BadRequest {
            message: format!("base url {base_url} has no host"),
        })?
        .to_ascii_lowercase();

    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}
