mod common;

use arbor_http_server::{handler, method, Dispatch, Request, Router, Server};
use common::{recorded, recording, trace, wrapping};

fn handled(server: &Server, method: &str, path: &str) -> arbor_http_server::Response {
    match server.dispatch(Request::new(method, path)) {
        Dispatch::Handled(response) => response,
        Dispatch::NotFound { .. } => panic!("expected '{path}' to be handled"),
    }
}

#[test]
fn chain_runs_in_registration_order_without_next() {
    let log = trace();
    let mut router = Router::new();
    router
        .get(
            "/seq",
            vec![
                recording("a", &log),
                recording("b", &log),
                recording("c", &log),
            ],
        )
        .unwrap();

    handled(&Server::new(router), method::GET, "/seq");
    assert_eq!(recorded(&log), vec!["a", "b", "c"]);
}

#[test]
fn next_gives_wrap_semantics() {
    let log = trace();
    let mut router = Router::new();
    router
        .get(
            "/wrapped",
            vec![
                wrapping("outer", &log),
                wrapping("inner", &log),
                recording("handler", &log),
            ],
        )
        .unwrap();

    handled(&Server::new(router), method::GET, "/wrapped");
    assert_eq!(
        recorded(&log),
        vec![
            "outer:before",
            "inner:before",
            "handler",
            "inner:after",
            "outer:after",
        ]
    );
}

#[test]
fn abort_skips_downstream_but_finishes_upstream() {
    let log = trace();
    let aborting = {
        let log = std::sync::Arc::clone(&log);
        handler(move |ctx| {
            log.lock().unwrap().push("guard".to_string());
            ctx.abort();
            assert!(ctx.is_aborted());
            // Cooperative: code after abort in the same handler still runs.
            log.lock().unwrap().push("guard:tail".to_string());
        })
    };

    let mut router = Router::new();
    router
        .get(
            "/guarded",
            vec![wrapping("outer", &log), aborting, recording("handler", &log)],
        )
        .unwrap();

    handled(&Server::new(router), method::GET, "/guarded");
    assert_eq!(
        recorded(&log),
        vec!["outer:before", "guard", "guard:tail", "outer:after"]
    );
}

#[test]
fn abort_with_status_commits_the_head() {
    let log = trace();
    let mut router = Router::new();
    router
        .get(
            "/private",
            vec![
                handler(|ctx| ctx.abort_with_status(401)),
                recording("handler", &log),
            ],
        )
        .unwrap();

    let response = handled(&Server::new(router), method::GET, "/private");
    assert_eq!(response.status, 401);
    assert!(recorded(&log).is_empty());
}

#[test]
fn abort_in_first_handler_skips_the_rest_without_next() {
    let log = trace();
    let aborting = {
        let log = std::sync::Arc::clone(&log);
        handler(move |ctx| {
            log.lock().unwrap().push("first".to_string());
            ctx.abort();
        })
    };

    let mut router = Router::new();
    router
        .get(
            "/stop",
            vec![aborting, recording("second", &log), recording("third", &log)],
        )
        .unwrap();

    handled(&Server::new(router), method::GET, "/stop");
    assert_eq!(recorded(&log), vec!["first"]);
}

#[test]
fn middleware_shares_state_through_the_store() {
    let mut router = Router::new();
    router
        .get(
            "/account",
            vec![
                handler(|ctx| ctx.set("user", "frank".to_string())),
                handler(|ctx| {
                    let user = ctx.get::<String>("user").unwrap();
                    ctx.string(200, &user);
                }),
            ],
        )
        .unwrap();

    let response = handled(&Server::new(router), method::GET, "/account");
    assert_eq!(response.body, b"frank");
}
