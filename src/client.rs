//! Query and database management calls

use crate::config::ServerInfo;
use crate::error::Result;
use crate::http::{self, Method};
use crate::urlencode::url_encode;

/// Run an InfluxQL query and return the raw response body
pub fn query(query: &str, server: &ServerInfo) -> Result<String> {
    let mut qs = String::from("&q=");
    url_encode(&mut qs, query);

    let mut resp = Vec::new();
    http::request(Method::Get, "query", &qs, &[], server, Some(&mut resp))?;
    Ok(String::from_utf8_lossy(&resp).into_owned())
}

/// Create a database.
///
/// Sent as a POST, since the server refuses `CREATE` statements over GET.
pub fn create_db(name: &str, server: &ServerInfo) -> Result<String> {
    let mut qs = String::from("&q=create+database+");
    url_encode(&mut qs, name);

    let mut resp = Vec::new();
    http::request(Method::Post, "query", &qs, &[], server, Some(&mut resp))?;
    Ok(String::from_utf8_lossy(&resp).into_owned())
}
