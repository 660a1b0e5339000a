//! Metrics exposition endpoint (`GET /metrics`).
//!
//! Serves the rendered gauge registry for pull-based scraping on the
//! configured TCP port.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: `EspHttpServer` with a single handler. On host/test: a
//! minimal `TcpListener` responder thread, so the exposition format can
//! be exercised end-to-end without hardware.

use crate::metrics::BedMetrics;

const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

pub struct MetricsServer {
    #[cfg(target_os = "espidf")]
    _server: esp_idf_svc::http::server::EspHttpServer<'static>,
    #[cfg(not(target_os = "espidf"))]
    port: u16,
}

#[cfg(target_os = "espidf")]
impl MetricsServer {
    /// Start the scrape endpoint. The returned handle owns the server;
    /// dropping it stops serving.
    pub fn bind(port: u16, metrics: &'static BedMetrics) -> anyhow::Result<Self> {
        use esp_idf_svc::http::server::{Configuration, EspHttpServer};
        use esp_idf_svc::http::Method;
        use esp_idf_svc::io::Write;

        let conf = Configuration {
            http_port: port,
            ..Default::default()
        };
        let mut server = EspHttpServer::new(&conf)?;
        server.fn_handler("/metrics", Method::Get, move |req| -> anyhow::Result<()> {
            let mut body = String::new();
            metrics
                .render_prometheus(&mut body)
                .map_err(|_| anyhow::anyhow!("metrics render failed"))?;
            let mut resp =
                req.into_response(200, Some("OK"), &[("Content-Type", CONTENT_TYPE)])?;
            resp.write_all(body.as_bytes())?;
            Ok(())
        })?;
        log::info!("metrics: scrape endpoint on :{port}/metrics");
        Ok(Self { _server: server })
    }
}

#[cfg(not(target_os = "espidf"))]
impl MetricsServer {
    /// Simulation: plain TCP responder. Any request gets the rendered
    /// registry; port 0 binds an ephemeral port (see [`port`]).
    ///
    /// [`port`]: Self::port
    pub fn bind(port: u16, metrics: &'static BedMetrics) -> anyhow::Result<Self> {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind(("127.0.0.1", port))?;
        let bound = listener.local_addr()?.port();
        std::thread::Builder::new()
            .name("metrics-http".into())
            .spawn(move || {
                for stream in listener.incoming() {
                    let Ok(mut stream) = stream else { continue };
                    // Drain the request line; a single-endpoint scrape
                    // target does not route.
                    let mut scratch = [0u8; 512];
                    let _ = stream.read(&mut scratch);

                    let mut body = String::new();
                    if metrics.render_prometheus(&mut body).is_err() {
                        continue;
                    }
                    let _ = write!(
                        stream,
                        "HTTP/1.0 200 OK\r\nContent-Type: {CONTENT_TYPE}\r\nContent-Length: {}\r\n\r\n{body}",
                        body.len(),
                    );
                }
            })?;
        log::info!("metrics(sim): scrape endpoint on :{bound}/metrics");
        Ok(Self { port: bound })
    }

    /// The actually bound port (useful with an ephemeral bind).
    pub fn port(&self) -> u16 {
        self.port
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn scrape_returns_rendered_gauges() {
        static METRICS: BedMetrics = BedMetrics::new();
        METRICS.temperature_f.set(68.5);
        METRICS.valve_open.set(1.0);

        let server = MetricsServer::bind(0, &METRICS).unwrap();
        let mut stream =
            std::net::TcpStream::connect(("127.0.0.1", server.port())).unwrap();
        stream
            .write_all(b"GET /metrics HTTP/1.0\r\n\r\n")
            .unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        assert!(response.starts_with("HTTP/1.0 200 OK"));
        assert!(response.contains("bed_temperature_fahrenheit 68.5"));
        assert!(response.contains("bed_valve_open 1"));
        assert!(response.contains("# TYPE bed_sensor_fault gauge"));
    }
}
