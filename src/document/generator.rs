//! Rendering of router and service blocks for a host.
//!
//! Output is un-indented (members at column zero); the inserter shifts it
//! under the target section. Every block ends with exactly one blank line.

use crate::document::tag::{
    Entity, EntityTag, MatchPolicy, PrefixPolicy, BACKEND_COMMENT, BACKEND_ROUTER_SUFFIX,
    FRONTEND_COMMENT, FRONTEND_ROUTER_SUFFIX, ROUTER_SUFFIX, SERVICE_COMMENT, SERVICE_SUFFIX,
    SHARED_COMMENT,
};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CERT_RESOLVER: &str = "letsencrypt";
pub const DEFAULT_REDIRECT_MIDDLEWARE: &str = "redirect-to-https";

const API_PREFIX: &str = "/api";
const WEB_ENTRY_POINT: &str = "web";
const SECURE_ENTRY_POINT: &str = "websecure";

/// Services the generated routers forward to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTargets {
    pub backend: String,
    pub frontend: String,
}

impl ServiceTargets {
    pub fn new(backend: impl Into<String>, frontend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            frontend: frontend.into(),
        }
    }

    /// One service behind both route pairs.
    pub fn shared(service: impl Into<String>) -> Self {
        let service = service.into();
        Self {
            backend: service.clone(),
            frontend: service,
        }
    }
}

/// Formatting switches for generated blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Two route pairs (API + web) vs a single combined pair.
    pub separate_frontend_backend: bool,
    /// Attach entry points instead of middleware references.
    pub skip_middlewares: bool,
    /// Port of the shared service; unused for separate pairs.
    pub port: u16,
    pub cert_resolver: String,
    pub redirect_middleware: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            separate_frontend_backend: true,
            skip_middlewares: false,
            port: DEFAULT_PORT,
            cert_resolver: DEFAULT_CERT_RESOLVER.to_string(),
            redirect_middleware: DEFAULT_REDIRECT_MIDDLEWARE.to_string(),
        }
    }
}

/// What a router hangs off besides its rule and service.
enum Attachment<'a> {
    Middleware(&'a str),
    NoMiddlewares,
    EntryPoint(&'a str),
}

struct RouterSpec<'a> {
    name: String,
    rule: String,
    service: &'a str,
    attachment: Attachment<'a>,
    cert_resolver: Option<&'a str>,
}

/// Render the router block for `entity` using the default tag policy.
pub fn render_block(entity: &Entity, targets: &ServiceTargets, options: &RenderOptions) -> String {
    render_block_with(entity, targets, options, &PrefixPolicy)
}

pub fn render_block_with(
    entity: &Entity,
    targets: &ServiceTargets,
    options: &RenderOptions,
    policy: &dyn MatchPolicy,
) -> String {
    let tag = policy.tag(entity);
    let host = entity.host();
    let mut out = String::new();

    if options.separate_frontend_backend {
        let api_rule = format!("{} && PathPrefix(`{API_PREFIX}`)", entity.host_marker());
        let web_rule = format!("{} && !PathPrefix(`{API_PREFIX}`)", entity.host_marker());

        push_line(&mut out, &format!("{BACKEND_COMMENT}{host}"));
        push_route_pair(&mut out, &tag.name(BACKEND_ROUTER_SUFFIX), &api_rule, &targets.backend, options);
        push_line(&mut out, &format!("{FRONTEND_COMMENT}{host}"));
        push_route_pair(&mut out, &tag.name(FRONTEND_ROUTER_SUFFIX), &web_rule, &targets.frontend, options);
    } else {
        let service = tag.name(SERVICE_SUFFIX);
        let name = tag.name(ROUTER_SUFFIX);
        push_line(&mut out, &format!("{SHARED_COMMENT}{host}"));
        push_router(&mut out, RouterSpec {
            name: name.clone(),
            rule: entity.host_marker(),
            service: &service,
            attachment: Attachment::EntryPoint(WEB_ENTRY_POINT),
            cert_resolver: None,
        });
        push_router(&mut out, RouterSpec {
            name: format!("{name}-websecure"),
            rule: entity.host_marker(),
            service: &service,
            attachment: Attachment::EntryPoint(SECURE_ENTRY_POINT),
            cert_resolver: Some(options.cert_resolver.as_str()),
        });
    }

    tracing::debug!(host, tag = %tag, length = out.len(), "Router block generated");
    out
}

/// Render the load-balancer definition backing a shared route pair.
pub fn render_service_block(entity: &Entity, targets: &ServiceTargets, options: &RenderOptions) -> String {
    render_service_block_with(entity, targets, options, &PrefixPolicy)
}

pub fn render_service_block_with(
    entity: &Entity,
    targets: &ServiceTargets,
    options: &RenderOptions,
    policy: &dyn MatchPolicy,
) -> String {
    let tag: EntityTag = policy.tag(entity);
    let mut out = String::new();
    push_line(&mut out, &format!("{SERVICE_COMMENT}{}", entity.host()));
    push_line(&mut out, &format!("{}:", tag.name(SERVICE_SUFFIX)));
    push_line(&mut out, "  loadBalancer:");
    push_line(&mut out, "    servers:");
    push_line(&mut out, &format!("    - url: http://{}:{}", targets.backend, options.port));
    push_line(&mut out, "    passHostHeader: true");
    out.push('\n');
    out
}

/// Plain HTTP router plus its `-websecure` twin.
fn push_route_pair(out: &mut String, name: &str, rule: &str, service: &str, options: &RenderOptions) {
    let (plain, secure) = if options.skip_middlewares {
        (
            Attachment::EntryPoint(WEB_ENTRY_POINT),
            Attachment::EntryPoint(SECURE_ENTRY_POINT),
        )
    } else {
        (
            Attachment::Middleware(&options.redirect_middleware),
            Attachment::NoMiddlewares,
        )
    };

    push_router(out, RouterSpec {
        name: name.to_string(),
        rule: rule.to_string(),
        service,
        attachment: plain,
        cert_resolver: None,
    });
    push_router(out, RouterSpec {
        name: format!("{name}-websecure"),
        rule: rule.to_string(),
        service,
        attachment: secure,
        cert_resolver: Some(options.cert_resolver.as_str()),
    });
}

fn push_router(out: &mut String, spec: RouterSpec<'_>) {
    push_line(out, &format!("{}:", spec.name));
    push_line(out, &format!("  rule: {}", spec.rule));
    push_line(out, &format!("  service: {}", spec.service));
    match spec.attachment {
        Attachment::Middleware(middleware) => {
            push_line(out, "  middlewares:");
            push_line(out, &format!("    - {middleware}"));
        }
        Attachment::NoMiddlewares => {
            push_line(out, "  middlewares: []");
        }
        Attachment::EntryPoint(entry_point) => {
            push_line(out, "  entryPoints:");
            push_line(out, &format!("    - {entry_point}"));
        }
    }
    if let Some(resolver) = spec.cert_resolver {
        push_line(out, "  tls:");
        push_line(out, &format!("    certResolver: {resolver}"));
    }
    out.push('\n');
}

/// Append `line` and a newline.
fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
