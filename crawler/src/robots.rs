use reqwest::Client;
use url::Url;

/// Rules of the `*` group of a robots.txt.
#[derive(Debug, Clone, Default)]
pub struct Robots {
    pub allows: Vec<String>,
    pub disallows: Vec<String>,
    pub crawl_delay_ms: Option<u64>,
}

impl Robots {
    pub fn parse(txt: &str) -> Self {
        let mut active = false;
        let mut rules = Self::default();
        for line in txt.lines() {
            let l = line.split('#').next().unwrap_or("").trim();
            if l.is_empty() { continue; }
            if let Some((k, v)) = l.split_once(':') {
                let key = k.trim().to_lowercase();
                let val = v.trim();
                match key.as_str() {
                    "user-agent" => { active = val == "*"; }
                    "allow" if active && !val.is_empty() => rules.allows.push(val.to_string()),
                    // An empty Disallow allows everything
                    "disallow" if active && !val.is_empty() => rules.disallows.push(val.to_string()),
                    "crawl-delay" if active => {
                        if let Ok(n) = val.parse::<f64>() { rules.crawl_delay_ms = Some((n * 1000.0) as u64); }
                    }
                    _ => {}
                }
            }
        }
        rules
    }

    /// Longest matching Allow vs Disallow wins; ties go to Allow.
    pub fn allows_path(&self, path: &str) -> bool {
        let longest = |rules: &[String]| rules.iter().filter(|r| path.starts_with(r.as_str())).map(String::len).max();
        match (longest(&self.allows), longest(&self.disallows)) {
            (Some(a), Some(d)) => a >= d,
            (_, None) => true,
            (None, Some(_)) => false,
        }
    }

    pub fn disallows_everything(&self) -> bool {
        self.disallows.iter().any(|d| d == "/") && self.allows.is_empty()
    }
}

/// Fetch robots.txt for the host of `url`. A missing or failing robots.txt allows everything.
pub async fn fetch(client: &Client, url: &Url) -> Robots {
    let Some(host) = url.host_str() else { return Robots::default() };
    let robots_url = match url.port() {
        Some(port) => format!("{}://{}:{}/robots.txt", url.scheme(), host, port),
        None => format!("{}://{}/robots.txt", url.scheme(), host),
    };
    let txt = match client.get(&robots_url).send().await {
        Ok(resp) if resp.status().is_success() => resp.text().await.unwrap_or_default(),
        Ok(resp) => {
            tracing::debug!(status = %resp.status(), %robots_url, "no robots.txt");
            String::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, %robots_url, "robots.txt fetch failed");
            String::new()
        }
    };
    Robots::parse(&txt)
}
