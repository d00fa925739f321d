#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use certsweep::tls::ensure_crypto_provider;
use rcgen::{
    BasicConstraints, CertificateParams, DnType, IsCa, KeyPair, generate_simple_self_signed,
};
use rustls::{
    ServerConfig,
    pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer},
};
use std::{net::TcpListener as StdTcpListener, sync::Arc};
use tokio::{io::AsyncReadExt, net::TcpListener, task::JoinHandle};
use tokio_rustls::TlsAcceptor;

/// A chain to serve and the key of its first certificate
pub struct Identity {
    pub chain: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
    /// PEM of the issuing CA, when there is one
    pub ca_pem: Option<String>,
}

/// Self-signed leaf valid for `names`
pub fn self_signed(names: &[&str]) -> Identity {
    let cert =
        generate_simple_self_signed(names.iter().map(ToString::to_string).collect::<Vec<_>>())
            .unwrap();
    Identity {
        chain: vec![cert.cert.der().clone()],
        key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(cert.key_pair.serialize_der())),
        ca_pem: None,
    }
}

/// A server whose only certificate is a CA
pub fn ca_only(cn: &str) -> Identity {
    let mut params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
    params.distinguished_name.push(DnType::CommonName, cn);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let key = KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();
    Identity {
        chain: vec![cert.der().clone()],
        key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key.serialize_der())),
        ca_pem: None,
    }
}

/// Leaf `cn` signed by a CA `issuer`, served as `[leaf, ca]`
pub fn signed_by_ca(cn: &str, issuer: &str) -> Identity {
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
    ca_params.distinguished_name.push(DnType::CommonName, issuer);
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let ca_key = KeyPair::generate().unwrap();
    let ca = ca_params.self_signed(&ca_key).unwrap();

    let mut leaf_params = CertificateParams::new(vec![cn.to_string()]).unwrap();
    leaf_params.distinguished_name.push(DnType::CommonName, cn);
    let leaf_key = KeyPair::generate().unwrap();
    let leaf = leaf_params.signed_by(&leaf_key, &ca, &ca_key).unwrap();

    Identity {
        chain: vec![leaf.der().clone(), ca.der().clone()],
        key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
        ca_pem: Some(ca.pem()),
    }
}

/// Local TLS server, aborted on drop
pub struct TlsServer {
    pub port: u16,
    handle: JoinHandle<()>,
}

impl TlsServer {
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }
}

impl Drop for TlsServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serve `identity` on a random local port until dropped
pub async fn serve(identity: Identity) -> TlsServer {
    ensure_crypto_provider();

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(identity.chain, identity.key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                return;
            };
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut stream) = acceptor.accept(socket).await {
                    // hold the connection until the client goes away
                    let mut buf = [0u8; 64];
                    let _ = stream.read(&mut buf).await;
                }
            });
        }
    });

    TlsServer { port, handle }
}

/// A local port with nothing listening on it
pub fn closed_port() -> u16 {
    StdTcpListener::bind(("127.0.0.1", 0))
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

pub fn hosts(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(ToString::to_string).collect()
}
