//! Best-effort technology fingerprinting
//!
//! Detection is a case-insensitive substring scan of a fixed catalog against
//! the raw markup and the page host. Every matching row appends one signal,
//! so a technology matched by several rows appears several times.

use crate::extract::TechSignal;

/// Where a signature is looked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Raw HTML of the page
    Markup,
    /// Host name of the page URL
    Host,
}

/// One catalog row: a lowercase needle and the signal it produces
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub needle: &'static str,
    pub scope: Scope,
    pub name: &'static str,
    /// Simple Icons slug
    pub icon: &'static str,
}

const fn markup(needle: &'static str, name: &'static str, icon: &'static str) -> Signature {
    Signature {
        needle,
        scope: Scope::Markup,
        name,
        icon,
    }
}

const fn host(needle: &'static str, name: &'static str, icon: &'static str) -> Signature {
    Signature {
        needle,
        scope: Scope::Host,
        name,
        icon,
    }
}

/// Signature catalog, evaluated top to bottom
pub const CATALOG: &[Signature] = &[
    markup("wp-content", "WordPress", "wordpress"),
    markup("wp-includes", "WordPress", "wordpress"),
    markup("cdn.shopify.com", "Shopify", "shopify"),
    host("myshopify.com", "Shopify", "shopify"),
    markup("static.wixstatic.com", "Wix", "wix"),
    host("wixsite.com", "Wix", "wix"),
    markup("squarespace", "Squarespace", "squarespace"),
    markup("webflow", "Webflow", "webflow"),
    markup("drupal", "Drupal", "drupal"),
    markup("joomla", "Joomla", "joomla"),
    markup("content=\"ghost", "Ghost", "ghost"),
    markup("__next_data__", "Next.js", "nextdotjs"),
    markup("/_next/static", "Next.js", "nextdotjs"),
    markup("__nuxt", "Nuxt", "nuxtdotjs"),
    markup("___gatsby", "Gatsby", "gatsby"),
    markup("data-reactroot", "React", "react"),
    markup("react-dom", "React", "react"),
    markup("data-v-", "Vue.js", "vuedotjs"),
    markup("ng-version", "Angular", "angular"),
    markup("svelte-", "Svelte", "svelte"),
    markup("jquery", "jQuery", "jquery"),
    markup("bootstrap", "Bootstrap", "bootstrap"),
    markup("tailwind", "Tailwind CSS", "tailwindcss"),
    markup("google-analytics.com", "Google Analytics", "googleanalytics"),
    markup("gtag(", "Google Analytics", "googleanalytics"),
    markup("googletagmanager.com", "Google Tag Manager", "googletagmanager"),
    markup("cloudflare", "Cloudflare", "cloudflare"),
    host("vercel.app", "Vercel", "vercel"),
    host("netlify.app", "Netlify", "netlify"),
    host("github.io", "GitHub Pages", "githubpages"),
    host("herokuapp.com", "Heroku", "heroku"),
];

const ICON_BASE: &str = "https://cdn.simpleicons.org/";

/// Runs the catalog against `html` and `host`, in catalog order
pub fn detect_tech_stack(html: &str, host: &str) -> Vec<TechSignal> {
    let markup_lower = html.to_lowercase();
    let host_lower = host.to_lowercase();

    CATALOG
        .iter()
        .filter(|signature| {
            let haystack = match signature.scope {
                Scope::Markup => &markup_lower,
                Scope::Host => &host_lower,
            };
            haystack.contains(signature.needle)
        })
        .map(|signature| TechSignal {
            name: signature.name.to_string(),
            icon: format!("{}{}", ICON_BASE, signature.icon),
        })
        .collect()
}
