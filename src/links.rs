use tracing::debug;

/// Whether `sublink` lies under the path of `link`.
///
/// This is a plain prefix test on the URL string: `https://a.com/x/y` is a
/// sublink of `https://a.com/x` and of `https://a.com/`, but
/// `https://a.com/xy` is not a sublink of `https://a.com/x`.
pub fn is_sublink_of(sublink: &str, link: &str) -> bool {
    if link.ends_with('/') {
        sublink.starts_with(link)
    } else {
        sublink
            .strip_prefix(link)
            .map_or(false, |rest| rest.starts_with('/'))
    }
}

/// Drops the tracking parameters a search engine appends after the target
/// (`...&sa=U&ved=...`) and percent-decodes what is left.
pub fn clean_link(raw: &str) -> String {
    let target = raw.split('&').next().unwrap_or_default();
    match urlencoding::decode(target) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(target.as_bytes()))
            .into_owned(),
    }
}

/// Ordered, deduplicated set of result links.
///
/// With `ignore_subdomains` the kept links never contain one another: a link
/// under an already kept path is dropped, and a new parent path evicts the
/// children kept before it. Which links survive depends on insertion order.
#[derive(Debug, Default)]
pub struct LinkCollector {
    ignore_subdomains: bool,
    links: Vec<String>,
}

impl LinkCollector {
    pub fn new(ignore_subdomains: bool) -> Self {
        Self {
            ignore_subdomains,
            links: Vec::new(),
        }
    }

    /// Cleans `raw` and keeps it if it is new. Returns whether it was kept.
    pub fn insert(&mut self, raw: &str) -> bool {
        let link = clean_link(raw);

        if self.links.contains(&link) {
            debug!("Skip duplicate link {}", link);
            return false;
        }

        if self.ignore_subdomains {
            if let Some(parent) = self.links.iter().find(|l| is_sublink_of(&link, l)) {
                debug!("Skip {} (under {})", link, parent);
                return false;
            }

            self.links.retain(|l| {
                let evict = is_sublink_of(l, &link);
                if evict {
                    debug!("Evict {} (under {})", l, link);
                }
                !evict
            });
        }

        self.links.push(link);
        true
    }

    pub fn into_links(self) -> Vec<String> {
        self.links
    }
}

/// Runs every raw link through a fresh [`LinkCollector`], in order.
pub fn collect<I>(raw_links: I, ignore_subdomains: bool) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut collector = LinkCollector::new(ignore_subdomains);
    for raw in raw_links {
        collector.insert(raw.as_ref());
    }
    collector.into_links()
}
