//! Built-in nameserver and domain lists

/// Public resolvers benchmarked when no nameserver override is given:
/// (address, name, country)
pub const NAMESERVERS: &[(&str, &str, &str)] = &[
    ("8.8.8.8", "Google", "US"),
    ("8.8.4.4", "Google", "US"),
    ("1.1.1.1", "Cloudflare", "US"),
    ("1.0.0.1", "Cloudflare", "US"),
    ("9.9.9.9", "Quad9", "CH"),
    ("149.112.112.112", "Quad9", "CH"),
    ("208.67.222.222", "OpenDNS", "US"),
    ("208.67.220.220", "OpenDNS", "US"),
    ("94.140.14.14", "AdGuard", "CY"),
    ("185.228.168.9", "CleanBrowsing", "US"),
    ("76.76.2.0", "Control D", "CA"),
    ("64.6.64.6", "UltraDNS", "US"),
    ("84.200.69.80", "DNS.WATCH", "DE"),
    ("80.80.80.80", "Freenom World", "NL"),
    ("77.88.8.8", "Yandex", "RU"),
];

/// Name used when a single nameserver is supplied on the command line
pub const USER_SUPPLIED_NAME: &str = "user supplied";

/// Name under which the host's own resolver competes
pub const LOCALHOST_NAME: &str = "localhost";

/// Domains queried in list order, most popular first
pub const DOMAINS: &[&str] = &[
    "google.com",
    "youtube.com",
    "facebook.com",
    "baidu.com",
    "wikipedia.org",
    "amazon.com",
    "twitter.com",
    "instagram.com",
    "yahoo.com",
    "linkedin.com",
    "netflix.com",
    "reddit.com",
    "microsoft.com",
    "apple.com",
    "bing.com",
    "live.com",
    "office.com",
    "twitch.tv",
    "ebay.com",
    "github.com",
    "stackoverflow.com",
    "whatsapp.com",
    "tiktok.com",
    "zoom.us",
    "pinterest.com",
    "paypal.com",
    "adobe.com",
    "dropbox.com",
    "spotify.com",
    "cloudflare.com",
    "wordpress.org",
    "mozilla.org",
    "imdb.com",
    "cnn.com",
    "bbc.co.uk",
    "nytimes.com",
    "theguardian.com",
    "espn.com",
    "weather.com",
    "walmart.com",
    "etsy.com",
    "booking.com",
    "tripadvisor.com",
    "airbnb.com",
    "salesforce.com",
    "oracle.com",
    "ibm.com",
    "intel.com",
    "nvidia.com",
    "samsung.com",
    "sony.com",
    "xbox.com",
    "steampowered.com",
    "discord.com",
    "slack.com",
    "tumblr.com",
    "quora.com",
    "medium.com",
    "vimeo.com",
    "soundcloud.com",
    "imgur.com",
    "craigslist.org",
    "indeed.com",
    "glassdoor.com",
    "yelp.com",
    "hulu.com",
    "disneyplus.com",
    "aliexpress.com",
    "alibaba.com",
    "taobao.com",
    "qq.com",
    "sina.com.cn",
    "weibo.com",
    "yandex.ru",
    "vk.com",
    "mail.ru",
    "naver.com",
    "rakuten.co.jp",
    "bild.de",
    "spiegel.de",
    "heise.de",
    "lemonde.fr",
    "orange.fr",
    "gov.uk",
    "europa.eu",
    "nasa.gov",
    "who.int",
    "archive.org",
    "w3.org",
    "python.org",
    "rust-lang.org",
    "crates.io",
    "docker.com",
    "kubernetes.io",
    "gitlab.com",
    "bitbucket.org",
    "atlassian.com",
    "digitalocean.com",
    "heroku.com",
    "akamai.com",
    "fastly.com",
    "letsencrypt.org",
    "debian.org",
    "ubuntu.com",
    "fedoraproject.org",
    "kernel.org",
    "gnu.org",
    "apache.org",
    "nginx.org",
    "openssl.org",
];
