//! Client for the Câmara dos Deputados open-data API.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://dadosabertos.camara.leg.br/api/v2/deputados";

/// State codes offered by the lookup form.
pub const UFS: [&str; 27] = [
    "AC", "AL", "AM", "AP", "BA", "CE", "DF", "ES", "GO", "MA", "MG", "MS", "MT", "PA", "PB", "PE",
    "PI", "PR", "RJ", "RN", "RO", "RR", "RS", "SC", "SE", "SP", "TO",
];

/// Parties offered by the lookup form.
pub const PARTIES: [&str; 9] = [
    "PT",
    "PL",
    "PSOL",
    "PP",
    "MDB",
    "PSDB",
    "PSD",
    "Republicanos",
    "União",
];

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid API address '{0}'")]
    InvalidUrl(String),
    #[error("API answered with HTTP {0}")]
    Status(StatusCode),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Optional search fields; blank ones are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeputyQuery {
    pub nome: String,
    pub sigla_uf: String,
    pub sigla_partido: String,
}

impl DeputyQuery {
    fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        [
            ("nome", self.nome.trim()),
            ("siglaUf", self.sigla_uf.trim()),
            ("siglaPartido", self.sigla_partido.trim()),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
    }

    /// Full request URL: `base?nome=..&siglaUf=..&siglaPartido=..`.
    pub fn url(&self, base: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(base).map_err(|_| LookupError::InvalidUrl(base.to_string()))?;
        let mut pairs = self.pairs().peekable();
        if pairs.peek().is_some() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// One deputy as returned in the `dados` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeputyCard {
    pub nome: String,
    pub url_foto: String,
    pub sigla_partido: String,
    pub sigla_uf: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    dados: Vec<DeputyCard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(Vec<DeputyCard>),
    NoResults,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// One blocking GET per search; no retries.
#[derive(Debug, Clone)]
pub struct LookupClient {
    http: Client,
    base_url: String,
}

impl LookupClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LookupError> {
        let http = Client::builder()
            .user_agent(concat!("deputy-viewer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(LookupClient {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn search(&self, query: &DeputyQuery) -> Result<LookupOutcome, LookupError> {
        let url = query.url(&self.base_url)?;
        log::info!("GET {url}");

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            log::warn!("deputy lookup failed with {status}");
            return Err(LookupError::Status(status));
        }

        let body = resp.text()?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        log::debug!("deputy lookup returned {} records", envelope.dados.len());

        if envelope.dados.is_empty() {
            Ok(LookupOutcome::NoResults)
        } else {
            Ok(LookupOutcome::Found(envelope.dados))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve exactly one canned HTTP response; yields the request line.
    fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 2 {
                line.clear();
            }
            stream.write_all(response.as_bytes()).unwrap();
            tx.send(request_line.trim_end().to_string()).unwrap();
        });

        (format!("http://{addr}/api/v2/deputados"), rx)
    }

    #[test]
    fn url_omits_blank_fields() {
        let q = DeputyQuery {
            nome: "".into(),
            sigla_uf: "SP".into(),
            sigla_partido: "PT".into(),
        };
        assert_eq!(
            q.url(DEFAULT_BASE_URL).unwrap().as_str(),
            "https://dadosabertos.camara.leg.br/api/v2/deputados?siglaUf=SP&siglaPartido=PT"
        );

        let empty = DeputyQuery::default();
        assert_eq!(empty.url(DEFAULT_BASE_URL).unwrap().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn url_encodes_names() {
        let q = DeputyQuery {
            nome: "João Silva".into(),
            ..Default::default()
        };
        let url = q.url(DEFAULT_BASE_URL).unwrap();
        let (k, v) = url.query_pairs().next().unwrap();
        assert_eq!((&*k, &*v), ("nome", "João Silva"));
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn bad_base_url_is_reported() {
        let err = DeputyQuery::default().url("not a url").unwrap_err();
        assert!(matches!(err, LookupError::InvalidUrl(_)));
    }

    #[test]
    fn server_error_surfaces_status() {
        let (base, _rx) = serve_once("500 Internal Server Error", "{}");
        let client = LookupClient::new(base).unwrap();
        let err = client.search(&DeputyQuery::default()).unwrap_err();
        assert!(matches!(err, LookupError::Status(s) if s.as_u16() == 500));
    }

    #[test]
    fn empty_dados_is_no_results() {
        let (base, _rx) = serve_once("200 OK", r#"{"dados": [], "links": []}"#);
        let client = LookupClient::new(base).unwrap();
        assert_eq!(
            client.search(&DeputyQuery::default()).unwrap(),
            LookupOutcome::NoResults
        );
    }

    #[test]
    fn found_cards_are_decoded() {
        let body = r#"{"dados": [{
            "id": 204554,
            "nome": "Ana Exemplo",
            "siglaPartido": "PT",
            "siglaUf": "SP",
            "urlFoto": "https://www.camara.leg.br/internet/deputado/bandep/204554.jpg",
            "email": "dep.anaexemplo@camara.leg.br"
        }]}"#;
        let (base, rx) = serve_once("200 OK", body);
        let client = LookupClient::new(base).unwrap();
        let query = DeputyQuery {
            sigla_uf: "SP".into(),
            ..Default::default()
        };

        let LookupOutcome::Found(cards) = client.search(&query).unwrap() else {
            panic!("expected results");
        };
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].nome, "Ana Exemplo");
        assert_eq!(
            cards[0].email.as_deref(),
            Some("dep.anaexemplo@camara.leg.br")
        );

        let request_line = rx.recv().unwrap();
        assert_eq!(request_line, "GET /api/v2/deputados?siglaUf=SP HTTP/1.1");
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let (base, _rx) = serve_once("200 OK", "<xml/>");
        let client = LookupClient::new(base).unwrap();
        let err = client.search(&DeputyQuery::default()).unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }
}
