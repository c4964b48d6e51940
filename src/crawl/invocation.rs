// src/crawl/invocation.rs
// =============================================================================
// Builds the argument vector for the external crawl executable.
//
// The crawler is invoked as:
//
//   <program> crawl <spider> -a allowed_domains=<host>, -a start_urls=<url>,
//
// Both keyword values are comma-separated lists on the crawler side, which is
// why each value is comma-terminated and why a value that itself contains a
// comma is refused (it would smuggle in a second domain or start URL).
// =============================================================================

use super::target::CrawlTarget;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlInvocation {
    /// Bare host the crawl is restricted to (port deliberately dropped)
    pub allowed_domain: String,
    /// Absolute URL the crawl starts from (port kept)
    pub start_url: String,
}

impl CrawlInvocation {
    // Derives the invocation from a validated target
    //
    // Returns: Err(reason) when a value cannot be expressed safely in the
    // crawler's comma-separated argument format
    pub fn from_target(target: &CrawlTarget) -> Result<Self, String> {
        let allowed_domain = target.host().to_string();
        let start_url = target.start_url();

        if allowed_domain.contains(',') {
            return Err(format!("host {:?} contains a comma", allowed_domain));
        }
        if start_url.contains(',') {
            return Err(format!("start URL {:?} contains a comma", start_url));
        }

        Ok(CrawlInvocation {
            allowed_domain,
            start_url,
        })
    }

    pub fn allowed_domains_arg(&self) -> String {
        format!("allowed_domains={},", self.allowed_domain)
    }

    pub fn start_urls_arg(&self) -> String {
        format!("start_urls={},", self.start_url)
    }

    // Full argument list handed to the crawl executable (program excluded)
    pub fn args(&self, spider: &str) -> Vec<String> {
        vec![
            "crawl".to_string(),
            spider.to_string(),
            "-a".to_string(),
            self.allowed_domains_arg(),
            "-a".to_string(),
            self.start_urls_arg(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(raw: &str) -> CrawlInvocation {
        CrawlInvocation::from_target(&CrawlTarget::parse(raw).unwrap()).unwrap()
    }

    #[test]
    fn test_happy_path_arguments() {
        let inv = invocation("http://example.com/path");
        assert_eq!(inv.allowed_domains_arg(), "allowed_domains=example.com,");
        assert_eq!(inv.start_urls_arg(), "start_urls=http://example.com/path,");
        assert_eq!(
            inv.args("osc"),
            vec![
                "crawl",
                "osc",
                "-a",
                "allowed_domains=example.com,",
                "-a",
                "start_urls=http://example.com/path,",
            ]
        );
    }

    #[test]
    fn test_port_only_survives_in_start_url() {
        let inv = invocation("http://example.com:8080/docs");
        assert_eq!(inv.allowed_domain, "example.com");
        assert_eq!(inv.start_url, "http://example.com:8080/docs");
    }

    #[test]
    fn test_comma_in_path_is_refused() {
        let target = CrawlTarget::parse("http://example.com/a,b").unwrap();
        assert!(CrawlInvocation::from_target(&target).is_err());
    }
}
