use slotmux::Tree;

fn insert_equal(tree: &mut Tree<&str>, route: &'static str, expected: &str) {
    if let Err(err) = tree.insert(route, route) {
        assert_eq!(err.to_string(), expected.trim(), "inserting {route}");
        return;
    }
    let expected: String = expected
        .trim()
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(tree.to_string().trim(), expected, "tree after {route}");
}

fn match_equal(tree: &Tree<&str>, path: &str, expected: &str) {
    match tree.at(path) {
        Ok(matched) => {
            let mut out = matched.pattern.to_string();
            for (key, value) in matched.params.iter() {
                out.push(' ');
                out.push_str(key);
                out.push('=');
                out.push_str(value);
            }
            assert_eq!(out, expected, "matching {path}");
        }
        Err(err) => assert_eq!(err.to_string(), expected, "matching {path}"),
    }
}

// https://en.wikipedia.org/wiki/Radix_tree#Insertion
#[test]
fn wikipedia_insert() {
    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/test",
        "
        /test [routable=/test]
        ",
    );
    insert_equal(
        &mut tree,
        "/slow",
        "
        /
        •test [routable=/test]
        •slow [routable=/slow]
        ",
    );
    insert_equal(
        &mut tree,
        "/water",
        "
        /
        •test [routable=/test]
        •slow [routable=/slow]
        •water [routable=/water]
        ",
    );
    insert_equal(
        &mut tree,
        "/slower",
        "
        /
        •test [routable=/test]
        •slow [routable=/slow]
        •••••er [routable=/slower]
        •water [routable=/water]
        ",
    );

    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/tester",
        "
        /tester [routable=/tester]
        ",
    );
    insert_equal(
        &mut tree,
        "/test",
        "
        /test [routable=/test]
        •••••er [routable=/tester]
        ",
    );

    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/test",
        "
        /test [routable=/test]
        ",
    );
    insert_equal(
        &mut tree,
        "/team",
        "
        /te
        •••st [routable=/test]
        •••am [routable=/team]
        ",
    );
    insert_equal(
        &mut tree,
        "/toast",
        "
        /t
        ••e
        •••st [routable=/test]
        •••am [routable=/team]
        ••oast [routable=/toast]
        ",
    );
}

#[test]
fn sample_insert() {
    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/hello/{name}",
        "
        /hello/{name} [routable=/hello/{name}]
        ",
    );
    insert_equal(
        &mut tree,
        "/howdy/{name}/",
        "
        /h
        ••ello/{name} [routable=/hello/{name}]
        ••owdy/{name} [routable=/howdy/{name}]
        ",
    );
    insert_equal(
        &mut tree,
        "/hello/{name}/elsewhere",
        "
        /h
        ••ello/{name} [routable=/hello/{name}]
        •••••••••••••/elsewhere [routable=/hello/{name}/elsewhere]
        ••owdy/{name} [routable=/howdy/{name}]
        ",
    );
    insert_equal(
        &mut tree,
        "/hello/{name}/admin/",
        "
        /h
        ••ello/{name} [routable=/hello/{name}]
        •••••••••••••/
        ••••••••••••••elsewhere [routable=/hello/{name}/elsewhere]
        ••••••••••••••admin [routable=/hello/{name}/admin]
        ••owdy/{name} [routable=/howdy/{name}]
        ",
    );
    insert_equal(
        &mut tree,
        "/hello/{name}/else/",
        "
        /h
        ••ello/{name} [routable=/hello/{name}]
        •••••••••••••/
        ••••••••••••••else [routable=/hello/{name}/else]
        ••••••••••••••••••where [routable=/hello/{name}/elsewhere]
        ••••••••••••••admin [routable=/hello/{name}/admin]
        ••owdy/{name} [routable=/howdy/{name}]
        ",
    );
}

#[test]
fn duplicates() {
    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/hello/{name}",
        "
        /hello/{name} [routable=/hello/{name}]
        ",
    );
    insert_equal(&mut tree, "/hello/{name}", r#"route already exists: "/hello/{name}""#);
    // a trailing slash does not make it a different route
    insert_equal(&mut tree, "/hello/{name}/", r#"route already exists: "/hello/{name}""#);
    insert_equal(
        &mut tree,
        "/hello",
        "
        /hello [routable=/hello]
        ••••••/{name} [routable=/hello/{name}]
        ",
    );
    insert_equal(&mut tree, "/hello", r#"route already exists: "/hello""#);

    // slots collide by position, not by name
    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/{name}",
        "
        /{name} [routable=/{name}]
        ",
    );
    insert_equal(&mut tree, "/{title}", r#"route already exists: "/{title}""#);
}

#[test]
fn different_slots() {
    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/{name}",
        "
        /{name} [routable=/{name}]
        ",
    );
    insert_equal(
        &mut tree,
        "/{first}/{last}",
        "
        /{name} [routable=/{name}]
        •••••••/{last} [routable=/{first}/{last}]
        ",
    );
    insert_equal(
        &mut tree,
        "/{first}/else",
        "
        /{name} [routable=/{name}]
        •••••••/
        ••••••••{last} [routable=/{first}/{last}]
        ••••••••else [routable=/{first}/else]
        ",
    );

    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/{name}",
        "
        /{name} [routable=/{name}]
        ",
    );
    insert_equal(
        &mut tree,
        "/else",
        "
        /
        •{name} [routable=/{name}]
        •else [routable=/else]
        ",
    );
}

#[test]
fn path_after_slot() {
    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/{name}",
        "
        /{name} [routable=/{name}]
        ",
    );
    insert_equal(
        &mut tree,
        "/",
        "
        / [routable=/]
        •{name} [routable=/{name}]
        ",
    );
    insert_equal(
        &mut tree,
        "/first/{name}",
        "
        / [routable=/]
        •{name} [routable=/{name}]
        •first/{name} [routable=/first/{name}]
        ",
    );
    insert_equal(
        &mut tree,
        "/first",
        "
        / [routable=/]
        •{name} [routable=/{name}]
        •first [routable=/first]
        ••••••/{name} [routable=/first/{name}]
        ",
    );
}

#[test]
fn optionals() {
    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/{name?}",
        "
        / [routable=/]
        •{name} [routable=/{name}]
        ",
    );
    insert_equal(
        &mut tree,
        "/first/{last?}",
        "
        / [routable=/]
        •{name} [routable=/{name}]
        •first [routable=/first]
        ••••••/{last} [routable=/first/{last}]
        ",
    );
    insert_equal(
        &mut tree,
        "/{first}/{last}",
        "
        / [routable=/]
        •{name} [routable=/{name}]
        •••••••/{last} [routable=/{first}/{last}]
        •first [routable=/first]
        ••••••/{last} [routable=/first/{last}]
        ",
    );
    insert_equal(
        &mut tree,
        "/first/else",
        "
        / [routable=/]
        •{name} [routable=/{name}]
        •••••••/{last} [routable=/{first}/{last}]
        •first [routable=/first]
        ••••••/
        •••••••{last} [routable=/first/{last}]
        •••••••else [routable=/first/else]
        ",
    );
}

#[test]
fn wildcards() {
    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/{name*}",
        "
        / [routable=/]
        •{name*} [routable=/{name*}]
        ",
    );
    insert_equal(
        &mut tree,
        "/first/{last*}",
        "
        / [routable=/]
        •{name*} [routable=/{name*}]
        •first [routable=/first]
        ••••••/{last*} [routable=/first/{last*}]
        ",
    );
    // a wildcard and a required slot at the same position stay
    // distinct edges
    insert_equal(
        &mut tree,
        "/{first}/{last}",
        "
        / [routable=/]
        •{name*} [routable=/{name*}]
        •first [routable=/first]
        ••••••/{last*} [routable=/first/{last*}]
        •{first}/{last} [routable=/{first}/{last}]
        ",
    );
    insert_equal(
        &mut tree,
        "/first/else",
        "
        / [routable=/]
        •{name*} [routable=/{name*}]
        •first [routable=/first]
        ••••••/
        •••••••{last*} [routable=/first/{last*}]
        •••••••else [routable=/first/else]
        •{first}/{last} [routable=/{first}/{last}]
        ",
    );
}

#[test]
fn root_swap() {
    let mut tree = Tree::new();
    insert_equal(
        &mut tree,
        "/hello",
        "
        /hello [routable=/hello]
        ",
    );
    insert_equal(
        &mut tree,
        "/",
        "
        / [routable=/]
        •hello [routable=/hello]
        ",
    );
}

#[test]
fn match_literal() {
    let mut tree = Tree::new();
    tree.insert("/hello", "/hello").unwrap();
    match_equal(&tree, "/hello", "/hello");
    match_equal(&tree, "/hello/world", r#"no match for "/hello/world""#);
    match_equal(&tree, "/", r#"no match for "/""#);
    match_equal(&tree, "/hello/", "/hello");
    tree.insert("/", "/").unwrap();
    match_equal(&tree, "/hello", "/hello");
    match_equal(&tree, "/hello/world", r#"no match for "/hello/world""#);
    match_equal(&tree, "/", "/");
    match_equal(&tree, "/hello/", "/hello");
}

#[test]
fn match_empty_tree() {
    let tree: Tree<&str> = Tree::new();
    match_equal(&tree, "/", r#"no match for "/""#);
    match_equal(&tree, "", r#"no match for """#);
}

#[test]
fn match_slots() {
    let mut tree = Tree::new();
    tree.insert("/users/{id}", "x").unwrap();
    tree.insert("/users/{id}/edit", "x").unwrap();
    tree.insert("/posts/{post_id}/comments/{id}", "x").unwrap();
    match_equal(&tree, "/users/10", "/users/{id} id=10");
    match_equal(&tree, "/users/10/edit", "/users/{id}/edit id=10");
    match_equal(
        &tree,
        "/posts/1/comments/2",
        "/posts/{post_id}/comments/{id} post_id=1 id=2",
    );
    match_equal(&tree, "/users", r#"no match for "/users""#);
    match_equal(&tree, "/users/", r#"no match for "/users""#);
}

#[test]
fn match_demarcated_slots() {
    let mut tree = Tree::new();
    tree.insert("/fly/{from}-{to}", "x").unwrap();
    match_equal(&tree, "/fly/sfo-lax", "/fly/{from}-{to} from=sfo to=lax");
    // the second slot is unbounded, so later dashes land in it
    match_equal(&tree, "/fly/sfo-lax-jfk", "/fly/{from}-{to} from=sfo to=lax-jfk");
    match_equal(&tree, "/fly/sfo", r#"no match for "/fly/sfo""#);

    let mut tree = Tree::new();
    tree.insert("/users/{id}.{format}", "x").unwrap();
    match_equal(&tree, "/users/1.json", "/users/{id}.{format} id=1 format=json");
    match_equal(&tree, "/users/1", r#"no match for "/users/1""#);
}

#[test]
fn match_regexp_slots() {
    let mut tree = Tree::new();
    tree.insert("/v{major|[0-9]+}.{minor|[0-9]+}", "x").unwrap();
    match_equal(
        &tree,
        "/v1.0",
        "/v{major|[0-9]+}.{minor|[0-9]+} major=1 minor=0",
    );
    match_equal(
        &tree,
        "/v10.25",
        "/v{major|[0-9]+}.{minor|[0-9]+} major=10 minor=25",
    );
    match_equal(&tree, "/v1.a", r#"no match for "/v1.a""#);
    match_equal(&tree, "/1.0", r#"no match for "/1.0""#);
}

#[test]
fn match_wildcard() {
    let mut tree = Tree::new();
    tree.insert("/{owner}/{repo}/{branch}/{path*}", "x").unwrap();
    match_equal(
        &tree,
        "/acme/site/main/src/app.css",
        "/{owner}/{repo}/{branch}/{path*} owner=acme repo=site branch=main path=src/app.css",
    );
    // the wildcard expansion also registered the bare prefix
    match_equal(
        &tree,
        "/acme/site/main",
        "/{owner}/{repo}/{branch} owner=acme repo=site branch=main",
    );
    match_equal(&tree, "/acme/site", r#"no match for "/acme/site""#);
}

#[test]
fn literals_shadow_slots() {
    // registration order must not matter
    let mut tree = Tree::new();
    tree.insert("/users/new", "literal").unwrap();
    tree.insert("/users/{id}", "slot").unwrap();
    match_equal(&tree, "/users/new", "/users/new");
    match_equal(&tree, "/users/other", "/users/{id} id=other");

    let mut tree = Tree::new();
    tree.insert("/users/{id}", "slot").unwrap();
    tree.insert("/users/new", "literal").unwrap();
    match_equal(&tree, "/users/new", "/users/new");
    match_equal(&tree, "/users/other", "/users/{id} id=other");
}

#[test]
fn sibling_slot_backtrack() {
    // an internal literal node fails over to a slot sibling
    let mut tree = Tree::new();
    tree.insert("/test", "x").unwrap();
    tree.insert("/team", "x").unwrap();
    tree.insert("/{x}", "x").unwrap();
    match_equal(&tree, "/te", "/{x} x=te");
    match_equal(&tree, "/test", "/test");
}

#[test]
fn optional_format() {
    let mut tree = Tree::new();
    tree.insert("/users/{id}", "plain").unwrap();
    tree.insert("/users/{id}.{format?}", "formatted").unwrap();
    match_equal(&tree, "/users/10", "/users/{id} id=10");
    match_equal(&tree, "/users/10.json", "/users/{id}.{format} id=10 format=json");

    let matched = tree.at("/users/10").unwrap();
    assert_eq!(*matched.handler, "plain");
    let matched = tree.at("/users/10.json").unwrap();
    assert_eq!(*matched.handler, "formatted");
}

#[test]
fn wildcard_fallback() {
    let mut tree = Tree::new();
    tree.insert("/", "root").unwrap();
    // both expand a "/" prefix, which the existing root absorbs
    tree.insert("/{public?}", "optional").unwrap();
    tree.insert("/{public*}", "wildcard").unwrap();
    match_equal(&tree, "/", "/");
    match_equal(&tree, "/index.css", "/{public} public=index.css");
    match_equal(&tree, "/assets/index.css", "/{public*} public=assets/index.css");

    let matched = tree.at("/").unwrap();
    assert_eq!(*matched.handler, "root");
}

#[test]
fn case_insensitive_literals() {
    let mut tree = Tree::new();
    tree.insert("/HI", "x").unwrap();
    assert_eq!(
        tree.insert("/hi", "x").unwrap_err().to_string(),
        r#"route already exists: "/hi""#
    );
    for path in ["/hi", "/HI", "/Hi", "/hI", "/hi/", "/HI///"] {
        match_equal(&tree, path, "/hi");
    }
}

#[test]
fn match_reports_normalised_path() {
    let mut tree = Tree::new();
    tree.insert("/hi", "x").unwrap();
    tree.insert("/users/{id}", "x").unwrap();
    assert_eq!(tree.at("/HI///").unwrap().path(), "/hi");
    assert_eq!(tree.at("/users/10/").unwrap().path(), "/users/10");
}

#[test]
fn find_by_pattern() {
    let mut tree = Tree::new();
    tree.insert("/users/{id}", "x").unwrap();
    let (pattern, handler) = tree.find("/users/{id}").unwrap();
    assert_eq!(pattern.to_string(), "/users/{id}");
    assert_eq!(*handler, "x");
    // normalised before comparison
    assert!(tree.find("/USERS/{id}/").is_ok());
    assert_eq!(
        tree.find("/missing").unwrap_err().to_string(),
        r#"no match for "/missing""#
    );
}

#[test]
fn enumerates_in_preorder() {
    let mut tree = Tree::new();
    tree.insert("/", "x").unwrap();
    tree.insert("/users", "x").unwrap();
    tree.insert("/users/{id}", "x").unwrap();
    let mut patterns = Vec::new();
    tree.for_each(&mut |pattern, _| patterns.push(pattern.to_string()));
    assert_eq!(patterns, ["/", "/users", "/users/{id}"]);
}
