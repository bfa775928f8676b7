//! Server-side captcha challenges.
//!
//! A challenge is a short digit string rendered as an SVG picture. The
//! expected answer never leaves the server except, when configured, in the
//! issuance response body. The client only holds an opaque correlator id in a
//! cookie. A challenge is removed the first time it is checked, whatever the
//! outcome, and is refused once its TTL has passed. At most `max_pending`
//! challenges are held; issuing past that evicts the ones closest to expiry.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use data_encoding::BASE64;
use rand::Rng;
use raceboard_config::CaptchaConfig;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

const WIDTH: u32 = 240;
const HEIGHT: u32 = 80;
const NOISE_LINES: usize = 6;

/// An issued challenge.
#[derive(Debug, Clone)]
pub struct Challenge {
    /// Correlator sent back to the client in a cookie.
    pub id: String,
    pub answer: String,
    /// `data:image/svg+xml;base64,...`
    pub picture: String,
}

#[derive(Debug)]
struct Pending {
    answer: String,
    expires_at: Instant,
    serial: u64,
}

#[derive(Debug)]
pub struct CaptchaStore {
    pending: Mutex<HashMap<String, Pending>>,
    ttl: Duration,
    length: usize,
    max_pending: usize,
    issued: AtomicU64,
}

impl CaptchaStore {
    pub fn new(config: &CaptchaConfig) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(config.ttl_seconds),
            length: config.length,
            max_pending: config.max_pending.max(1),
            issued: AtomicU64::new(0),
        }
    }

    /// Issues a challenge with a random answer.
    pub async fn issue(&self) -> Challenge {
        let answer = random_digits(self.length);
        self.register(answer).await
    }

    /// Issues a challenge with a caller-chosen answer.
    pub async fn register(&self, answer: impl Into<String>) -> Challenge {
        let answer = answer.into();
        let picture = render_svg(&answer);
        let id = Uuid::new_v4().to_string();
        let now = Instant::now();
        let serial = self.issued.fetch_add(1, Ordering::Relaxed);

        let mut pending = self.pending.lock().await;
        pending.retain(|_, entry| entry.expires_at > now);
        while pending.len() >= self.max_pending {
            let Some(oldest) = pending
                .iter()
                .min_by_key(|(_, entry)| (entry.expires_at, entry.serial))
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            pending.remove(&oldest);
        }
        pending.insert(
            id.clone(),
            Pending {
                answer: answer.clone(),
                expires_at: now + self.ttl,
                serial,
            },
        );

        Challenge {
            id,
            answer,
            picture,
        }
    }

    /// Checks `submitted` against the challenge `id` and retires it.
    ///
    /// Returns `false` for unknown, expired, empty or mismatched answers.
    pub async fn consume(&self, id: &str, submitted: &str) -> bool {
        let Some(entry) = self.pending.lock().await.remove(id) else {
            return false;
        };
        if entry.expires_at <= Instant::now() || submitted.is_empty() {
            return false;
        }
        constant_time_eq(entry.answer.as_bytes(), submitted.as_bytes())
    }

    /// Number of challenges not yet consumed or purged.
    pub async fn pending(&self) -> usize {
        self.pending.lock().await.len()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn random_digits(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

fn render_svg(answer: &str) -> String {
    let mut rng = rand::thread_rng();
    let mut svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}"><rect width="100%" height="100%" fill="#f4f4f4"/>"##
    );

    for _ in 0..NOISE_LINES {
        let _ = write!(
            svg,
            r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#{:06x}" stroke-width="1.5"/>"##,
            rng.gen_range(0..WIDTH),
            rng.gen_range(0..HEIGHT),
            rng.gen_range(0..WIDTH),
            rng.gen_range(0..HEIGHT),
            rng.gen_range(0x40_0000..0xc0_0000u32),
        );
    }

    let count = u32::try_from(answer.chars().count()).unwrap_or(1).max(1);
    let step = WIDTH / (count + 1);
    for (i, digit) in (1u32..).zip(answer.chars()) {
        let _ = write!(
            svg,
            r##"<text x="{}" y="{}" font-family="monospace" font-size="40" fill="#{:06x}" transform="rotate({} {} {})">{}</text>"##,
            (step * i).saturating_sub(10),
            HEIGHT / 2 + 14 + rng.gen_range(0..10),
            rng.gen_range(0..0x60_0000u32),
            rng.gen_range(-25i32..25),
            step * i,
            HEIGHT / 2,
            digit,
        );
    }
    svg.push_str("</svg>");

    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg.as_bytes()))
}
