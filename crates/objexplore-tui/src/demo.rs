//! A built-in object graph for trying the explorer

use objexplore::object::Value;

/// Items in the `samples` list, enough to exceed the default member cap
const SAMPLE_COUNT: i64 = 6_000;

/// A small application-like object graph
///
/// Covers every member kind, a broken property, nested containers and a
/// list large enough to be truncated.
pub fn demo_object() -> Value {
    let server = |host: &str, port: i64| {
        Value::instance("Server")
            .attr("host", host)
            .attr("port", port)
            .attr("tls", port == 443)
            .attr("connect", Value::function("connect", "(self, timeout=None)"))
            .build()
    };

    let config = Value::instance("Config")
        .doc("Runtime configuration loaded at startup.")
        .attr("debug", false)
        .attr("ratio", 0.75)
        .attr("servers", Value::list([server("db1.internal", 5432), server("api.example.com", 443)]))
        .attr(
            "limits",
            Value::map([
                ("requests", Value::Int(1_000)),
                ("burst", Value::Int(50)),
                ("timeout", Value::Float(2.5)),
            ]),
        )
        .property("path", "/etc/app/config.toml", false)
        .broken("secrets", "PermissionError: vault is sealed")
        .attr("_cache", Value::map([("warm", Value::Bool(true))]))
        .attr(
            "reload",
            Value::function_with_doc("reload", "(self)", "Re-read the configuration file."),
        )
        .build();

    let user_class = Value::class("User")
        .doc("A registered account.")
        .attr("kind", "user")
        .attr(
            "greet",
            Value::function_with_doc("greet", "(self, other)", "Say hello to another user."),
        )
        .property("display_name", "anonymous", true);

    let users = Value::list(["ada", "grace", "linus"].into_iter().map(|name| {
        Value::instance("User")
            .attr("name", name)
            .attr("active", name != "linus")
            .attr("tags", Value::list([Value::str("admin"), Value::str(name)]))
            .build()
    }));

    let json = Value::module("json")
        .doc("JSON encoder and decoder.")
        .attr("dumps", Value::function("dumps", "(obj, *, indent=None)"))
        .attr("loads", Value::function("loads", "(s)"))
        .attr("JSONDecodeError", Value::class("JSONDecodeError"));

    Value::module("demo")
        .doc("Sample objects to explore. Press ? for keys.")
        .attr("config", config)
        .attr("users", users)
        .attr("User", user_class)
        .attr("json", json)
        .attr("samples", Value::list((0..SAMPLE_COUNT).map(Value::Int)))
        .attr("greeting", "hello, world")
        .attr("nothing", Value::None)
        .attr("_private_counter", 42i64)
        .attr("main", Value::function_with_doc("main", "(argv=None)", "Entry point."))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use objexplore::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_root() {
        let demo = demo_object();
        let explorer = Explorer::with_label(&demo, "demo", ExplorerOptions::default());
        let kinds: Vec<_> = explorer.view().members.iter().map(|m| m.kind).collect();
        for kind in [MemberKind::Data, MemberKind::Method, MemberKind::Class, MemberKind::Module] {
            assert!(kinds.contains(&kind), "missing {kind}");
        }
    }

    #[test]
    fn test_demo_samples_overflow() {
        let demo = demo_object();
        let mut explorer = Explorer::with_label(&demo, "demo", ExplorerOptions::default());
        explorer.descend("samples");
        assert_eq!(
            explorer.notice(),
            Some(&Status::Overflow {
                total: 6_000,
                kept: 5_000
            })
        );
        explorer.move_to_bottom();
        let last = explorer.selected_entry().map(|m| m.name.as_str());
        assert_eq!(last, Some("[4999]"));
    }

    #[test]
    fn test_demo_nested_path() {
        let demo = demo_object();
        let mut explorer = Explorer::with_label(&demo, "demo", ExplorerOptions::default());
        explorer.descend("config");
        explorer.descend("servers");
        explorer.descend("[1]");
        let view = explorer.view();
        assert_eq!(view.dotpath, "demo.config.servers[1]");
        assert_eq!(view.type_name, "Server");
    }
}
