/// Environment variable names and fixed values shared across the crate.

// Credential for the CMS API
pub const NOTION_TOKEN_ENV: &str = "NOTION_TOKEN";

// One data-source id per content type; an unset or empty value disables that type
pub const ROOMS_DB_ENV: &str = "NOTION_ROOMS_DB_ID";
pub const PLANS_DB_ENV: &str = "NOTION_PLANS_DB_ID";
pub const JOURNAL_DB_ENV: &str = "NOTION_JOURNAL_DB_ID";
pub const STORIES_DB_ENV: &str = "NOTION_STORIES_DB_ID";
pub const EXPERIENCES_DB_ENV: &str = "NOTION_EXPERIENCES_DB_ID";
pub const CUISINES_DB_ENV: &str = "NOTION_CUISINES_DB_ID";
pub const DISHES_DB_ENV: &str = "NOTION_DISHES_DB_ID";
pub const CHEFS_DB_ENV: &str = "NOTION_CHEFS_DB_ID";
pub const BANNERS_DB_ENV: &str = "NOTION_HOME_BANNERS_DB_ID";

// Port override for the HTTP server
pub const PORT_ENV: &str = "PORT";

pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_API_VERSION: &str = "2022-06-28";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Shown for experiences whose icon is left blank in the CMS.
pub const DEFAULT_EXPERIENCE_ICON: &str = "✨";

/// Dish status used when the CMS leaves it unset ("currently served").
pub const DEFAULT_DISH_STATUS: &str = "供应中";
