mod common;

use std::sync::Arc;

use arbor_http_server::{method, Lookup, RegistrationError, Router};
use common::ok;

fn matched(router: &Router, method: &str, path: &str) -> arbor_http_server::RouteMatch {
    match router.lookup(method, path) {
        Lookup::Matched(m) => m,
        Lookup::NotFound { .. } => panic!("expected '{path}' to match"),
    }
}

mod registration {
    use super::*;

    #[test]
    fn rejects_pattern_without_leading_slash() {
        let mut router = Router::new();
        let err = router.get("users", vec![ok("x")]).unwrap_err();
        assert!(matches!(err, RegistrationError::PathMissingLeadingSlash { .. }));
        assert_eq!(err.code(), 10001);
    }

    #[test]
    fn rejects_empty_method() {
        let mut router = Router::new();
        let err = router.add_route("", "/users", vec![ok("x")]).unwrap_err();
        assert_eq!(err, RegistrationError::EmptyMethod);
    }

    #[test]
    fn rejects_non_uppercase_method() {
        let mut router = Router::new();
        let err = router.add_route("get", "/users", vec![ok("x")]).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidMethod { .. }));
    }

    #[test]
    fn rejects_empty_handler_chain() {
        let mut router = Router::new();
        let err = router.get("/users", vec![]).unwrap_err();
        assert!(matches!(err, RegistrationError::EmptyHandlerChain { .. }));
    }

    #[test]
    fn rejects_chain_at_flow_ceiling() {
        let mut router = Router::new();
        let below: Vec<_> = (0..62).map(|_| ok("x")).collect();
        router.get("/ok", below).unwrap();

        let at_ceiling: Vec<_> = (0..63).map(|_| ok("x")).collect();
        let err = router.get("/too-long", at_ceiling).unwrap_err();
        assert!(matches!(err, RegistrationError::ChainTooLong { len: 63, .. }));
    }

    #[test]
    fn rejects_non_ascii_pattern() {
        let mut router = Router::new();
        let err = router.get("/caf\u{e9}", vec![ok("x")]).unwrap_err();
        assert!(matches!(err, RegistrationError::PathNotAscii { .. }));
    }

    #[test]
    fn custom_uppercase_methods_route_independently() {
        let mut router = Router::new();
        router.add_route("PURGE", "/cache", vec![ok("purged")]).unwrap();
        router.get("/cache", vec![ok("got")]).unwrap();

        assert!(matches!(router.lookup("PURGE", "/cache"), Lookup::Matched(_)));
        assert!(matches!(router.lookup(method::GET, "/cache"), Lookup::Matched(_)));
        assert!(matches!(
            router.lookup(method::POST, "/cache"),
            Lookup::NotFound { .. }
        ));
    }

    #[test]
    fn amending_identical_route_replaces_chain() {
        let mut router = Router::new();
        let first = ok("first");
        let second = ok("second");
        router.get("/page", vec![first.clone()]).unwrap();
        router.get("/page", vec![second.clone()]).unwrap();

        let m = matched(&router, method::GET, "/page");
        assert!(Arc::ptr_eq(&m.handlers[0], &second));
        assert!(!Arc::ptr_eq(&m.handlers[0], &first));
    }

    #[test]
    fn any_registers_every_standard_method() {
        let mut router = Router::new();
        router.any("/ping", vec![ok("pong")]).unwrap();
        for m in method::ALL {
            assert!(matches!(router.lookup(m, "/ping"), Lookup::Matched(_)));
        }
    }
}

mod chain_identity {
    use super::*;

    #[test]
    fn lookup_returns_the_registered_chain_by_reference() {
        let mut router = Router::new();
        let middleware = ok("m");
        let terminal = ok("t");
        router
            .get("/users/:id", vec![middleware.clone(), terminal.clone()])
            .unwrap();

        let a = matched(&router, method::GET, "/users/1");
        let b = matched(&router, method::GET, "/users/2");
        assert!(Arc::ptr_eq(&a.handlers, &b.handlers));
        assert!(Arc::ptr_eq(&a.handlers[0], &middleware));
        assert!(Arc::ptr_eq(&a.handlers[1], &terminal));
    }
}

mod wildcards {
    use super::*;

    #[test]
    fn rejects_conflicting_param_names_at_same_position() {
        let mut router = Router::new();
        router.get("/user/:id", vec![ok("a")]).unwrap();
        let err = router.get("/user/:name", vec![ok("b")]).unwrap_err();
        assert!(matches!(err, RegistrationError::WildcardConflict { .. }));
        assert_eq!(err.code(), 10011);
    }

    #[test]
    fn accepts_static_sibling_next_to_param() {
        let mut router = Router::new();
        router.get("/user/:id", vec![ok("param")]).unwrap();
        router.get("/user/new", vec![ok("static")]).unwrap();

        assert_eq!(matched(&router, method::GET, "/user/new").full_path, "/user/new");
        assert_eq!(matched(&router, method::GET, "/user/7").full_path, "/user/:id");
    }

    #[test]
    fn reuses_identical_param_across_routes() {
        let mut router = Router::new();
        router.get("/user/:id", vec![ok("one")]).unwrap();
        router.get("/user/:id/posts", vec![ok("two")]).unwrap();

        assert_eq!(
            matched(&router, method::GET, "/user/9/posts").full_path,
            "/user/:id/posts"
        );
    }

    #[test]
    fn rejects_two_wildcards_in_one_segment() {
        let mut router = Router::new();
        let err = router.get("/x/:a:b", vec![ok("x")]).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::MultipleWildcardsPerSegment { .. }
        ));
    }

    #[test]
    fn rejects_unnamed_wildcards() {
        let mut router = Router::new();
        let err = router.get("/x/:", vec![ok("x")]).unwrap_err();
        assert!(matches!(err, RegistrationError::UnnamedWildcard { .. }));

        let mut router = Router::new();
        let err = router.get("/x/*", vec![ok("x")]).unwrap_err();
        assert!(matches!(err, RegistrationError::UnnamedWildcard { .. }));
    }

    #[test]
    fn rejects_catch_all_before_end() {
        let mut router = Router::new();
        let err = router.get("/files/*rest/meta", vec![ok("x")]).unwrap_err();
        assert!(matches!(err, RegistrationError::CatchAllNotAtEnd { .. }));
    }

    #[test]
    fn rejects_catch_all_without_preceding_slash() {
        let mut router = Router::new();
        let err = router.get("/files*rest", vec![ok("x")]).unwrap_err();
        assert!(matches!(err, RegistrationError::CatchAllMissingSlash { .. }));
    }

    #[test]
    fn rejects_catch_all_shadowing_slash_terminated_route() {
        let mut router = Router::new();
        router.get("/src/", vec![ok("dir")]).unwrap();
        let err = router.get("/src/*files", vec![ok("x")]).unwrap_err();
        assert!(matches!(err, RegistrationError::CatchAllConflict { .. }));
    }

    #[test]
    fn rejects_second_catch_all_at_same_position() {
        let mut router = Router::new();
        router.get("/s/*a", vec![ok("a")]).unwrap();
        let err = router.get("/s/*b", vec![ok("b")]).unwrap_err();
        assert!(matches!(err, RegistrationError::WildcardConflict { .. }));
    }
}

mod groups {
    use super::*;
    use crate::common::{recorded, recording, trace};
    use arbor_http_server::{Dispatch, Request, Server};

    #[test]
    fn nested_groups_join_paths() {
        let mut router = Router::new();
        {
            let mut api = router.group("/api");
            assert_eq!(api.base_path(), "/api");
            let mut v1 = api.group("/v1");
            assert_eq!(v1.base_path(), "/api/v1");
            v1.get("/users", vec![ok("users")]).unwrap();
            v1.get("/users/", vec![ok("users-dir")]).unwrap();
        }
        assert_eq!(
            matched(&router, method::GET, "/api/v1/users").full_path,
            "/api/v1/users"
        );
        assert_eq!(
            matched(&router, method::GET, "/api/v1/users/").full_path,
            "/api/v1/users/"
        );
    }

    #[test]
    fn group_handlers_run_before_route_handlers() {
        let log = trace();
        let mut router = Router::new();
        router.use_middleware(vec![recording("global", &log)]);
        {
            let mut api = router.group("/api");
            api.use_middleware(vec![recording("group", &log)]);
            api.get("/thing", vec![recording("route", &log)]).unwrap();
        }

        let server = Server::new(router);
        let out = server.dispatch(Request::new(method::GET, "/api/thing"));
        assert!(matches!(out, Dispatch::Handled(_)));
        assert_eq!(recorded(&log), vec!["global", "group", "route"]);
    }

    #[test]
    fn group_relative_trailing_slash_is_preserved() {
        let mut router = Router::new();
        router.group("/docs").get("/guide/", vec![ok("g")]).unwrap();
        assert_eq!(
            matched(&router, method::GET, "/docs/guide/").full_path,
            "/docs/guide/"
        );
    }
}
