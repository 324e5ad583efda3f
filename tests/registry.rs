use std::panic::{self, AssertUnwindSafe};

use waypost::path::normalize;
use waypost::{Context, Handler, Method, Middleware, Next, Registry, Request};

fn noop() -> Handler {
    Handler::sync(|_ctx: Context| "ok")
}

fn mw(name: &str) -> Middleware {
    Middleware::from_fn(|req: Request, next: Next| next.run(req)).named(name)
}

fn chain(registry: &Registry, index: usize) -> Vec<String> {
    registry.routes()[index]
        .middlewares()
        .iter()
        .map(|m| m.name().to_owned())
        .collect()
}

#[test]
fn normalization_is_idempotent() {
    for raw in ["", "/", "//foo//bar/", "a/b", "/a//b///c/", "////x"] {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
        assert!(once.starts_with('/'));
        assert!(!once.contains("//"));
    }
    assert_eq!(normalize("//foo//bar/"), "/foo/bar");
    assert_eq!(normalize(""), "/");
}

#[test]
fn group_prefixes_compose() {
    let mut routes = Registry::new();
    routes.get("top", noop());
    routes.group("/foo", |r| {
        r.get("/bar", noop());
        r.group("/baz", |r| {
            r.get("/bar", noop());
        });
        r.group("", |r| {
            r.get("/", noop());
        });
    });
    routes.group("//nested//deep/", |r| {
        r.post("leaf/", noop());
    });

    let paths: Vec<_> = routes.routes().iter().map(|d| d.path()).collect();
    assert_eq!(paths, ["/top", "/foo/bar", "/foo/baz/bar", "/foo", "/nested/deep/leaf"]);
}

#[test]
fn middleware_chain_is_global_then_group_then_route() {
    let mut routes = Registry::new();

    routes.middleware([mw("A")], |r| {
        r.group_with("/x", [mw("B")], |r| {
            r.get("/one", noop()).middleware(mw("C"));
        });
    });
    // Wrapping calls in the other order must not change the chain.
    routes.group_with("/y", [mw("B")], |r| {
        r.middleware([mw("A")], |r| {
            r.get("/two", noop()).middlewares([mw("C")]);
        });
    });

    assert_eq!(chain(&routes, 0), ["A", "B", "C"]);
    assert_eq!(chain(&routes, 1), ["A", "B", "C"]);
}

#[test]
fn nested_scopes_accumulate_middleware() {
    let mut routes = Registry::new();
    routes.middleware([mw("g1")], |r| {
        r.middleware([mw("g2")], |r| {
            r.group_with("/a", [mw("a")], |r| {
                r.group_with("/b", [mw("b")], |r| {
                    r.get("/leaf", noop());
                });
                r.get("/mid", noop());
            });
        });
        r.get("/outer", noop());
    });

    assert_eq!(chain(&routes, 0), ["g1", "g2", "a", "b"]);
    assert_eq!(chain(&routes, 1), ["g1", "g2", "a"]);
    assert_eq!(chain(&routes, 2), ["g1"]);
}

#[test]
fn scope_is_restored_after_callbacks() {
    let mut routes = Registry::new();
    routes.middleware([mw("outer")], |r| {
        r.group_with("/api", [mw("grp")], |r| {
            r.group("/v1", |_| {});
            assert_eq!(r.prefix(), "/api");
            assert_eq!(r.group_middlewares().len(), 1);
        });
        assert_eq!(r.prefix(), "");
        assert!(r.group_middlewares().is_empty());
        assert_eq!(r.global_middlewares().len(), 1);
    });
    assert!(routes.global_middlewares().is_empty());
}

#[test]
fn scope_is_restored_when_a_callback_panics() {
    let mut routes = Registry::new();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        routes.middleware([mw("auth")], |r| {
            r.group_with("/api", [mw("grp")], |r| {
                r.get("/before", noop());
                panic!("route file blew up");
            });
        });
    }));

    assert!(result.is_err());
    assert_eq!(routes.prefix(), "");
    assert!(routes.group_middlewares().is_empty());
    assert!(routes.global_middlewares().is_empty());

    // Work done before the panic is kept, and later routes see a clean scope.
    routes.get("/after", noop());
    assert_eq!(routes.routes()[0].path(), "/api/before");
    assert_eq!(routes.routes()[1].path(), "/after");
    assert!(routes.routes()[1].middlewares().is_empty());
}

#[test]
fn registered_paths_are_not_retroactive() {
    let mut routes = Registry::new();
    routes.group("/v1", |r| {
        r.get("/users", noop());
    });
    routes.group("/v2", |r| {
        r.get("/users", noop());
    });
    assert_eq!(routes.routes()[0].path(), "/v1/users");
    assert_eq!(routes.routes()[1].path(), "/v2/users");
}

#[test]
fn shorthands_match_add() {
    let mut routes = Registry::new();
    routes.get("/r", noop());
    routes.post("/r", noop());
    routes.put("/r", noop());
    routes.delete("/r", noop());
    routes.patch("/r", noop());
    routes.options("/r", noop());
    routes.head("/r", noop());
    for method in Method::ALL {
        routes.add(method, "/r", noop());
    }

    let defs = routes.routes();
    for i in 0..7 {
        assert_eq!(defs[i].methods(), defs[i + 7].methods());
        assert_eq!(defs[i].path(), defs[i + 7].path());
        assert_eq!(defs[i].middlewares().len(), defs[i + 7].middlewares().len());
    }
    assert_eq!(defs[3].methods(), ["delete"]);
}

#[test]
fn add_accepts_token_lists_without_validating() {
    let mut routes = Registry::new();
    routes.add(["GET", "banana"], "/fruit", noop());
    routes.add(vec!["all"], "/any", noop());
    routes.add("Post".to_owned(), "/form", noop());

    assert_eq!(routes.routes()[0].methods(), ["get", "banana"]);
    assert_eq!(routes.routes()[1].methods(), ["all"]);
    assert_eq!(routes.routes()[2].methods(), ["post"]);
}

#[test]
fn middleware_identity_is_preserved() {
    let auth = mw("auth");
    let mut routes = Registry::new();
    routes.middleware([auth.clone()], |r| {
        r.get("/x", noop());
    });
    assert!(Middleware::ptr_eq(&routes.routes()[0].middlewares()[0], &auth));
}
