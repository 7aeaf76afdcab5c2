//! Mezzio (Laminas) directory layout.

use super::PresetDefinition;

pub struct MezzioPreset;

impl PresetDefinition for MezzioPreset {
    const KEY: &'static str = "mezzio";
    const NAME: &'static str = "Mezzio/Laminas";
    const DESCRIPTION: &'static str =
        "Mezzio Framework directory structure with src, templates, data, and modules directories";

    const PATHS: &'static [(&'static str, &'static str)] = &[
        ("src", "src"),
        ("config", "config"),
        ("templates", "templates"),
        ("data", "data"),
        ("modules", "modules"),
        ("bin", "bin"),
        ("handlers", "src/Handler"),
        ("middleware", "src/Middleware"),
        ("services", "src/Service"),
        ("factories", "src/Factory"),
        ("entities", "src/Entity"),
        ("repositories", "src/Repository"),
        ("views", "templates"),
        ("layouts", "templates/layout"),
        ("app_templates", "templates/app"),
        ("error_templates", "templates/error"),
        ("cache", "data/cache"),
        ("logs", "data/logs"),
        ("storage", "data/storage"),
        ("uploads", "data/uploads"),
        ("database", "data/database"),
        ("autoload", "config/autoload"),
        ("routes", "config/routes"),
        ("assets", "public/assets"),
        ("css", "public/assets/css"),
        ("js", "public/assets/js"),
        ("images", "public/assets/images"),
        ("fonts", "public/assets/fonts"),
        ("app_module", "modules/App"),
        ("user_module", "modules/User"),
        ("admin_module", "modules/Admin"),
        ("content", "content"),
        ("pages", "content/pages"),
        ("posts", "content/posts"),
        ("docs", "content/docs"),
    ];
}
