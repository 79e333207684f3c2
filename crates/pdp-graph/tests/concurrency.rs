use pdp_graph::Graph;
use std::sync::Arc;
use std::thread;

/// Concurrent writers and a concurrent reader must not deadlock or panic;
/// `HasPath` only needs to observe *some* consistent state, not a specific one.
#[test]
fn concurrent_inserts_and_reads_do_not_deadlock() {
    let graph = Arc::new(Graph::new());

    let writer_handles: Vec<_> = (0..8)
        .map(|i| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                graph.add_relation(format!("user:{i}"), "group:admins");
                graph.add_relation("group:admins", "resource:shared");
            })
        })
        .collect();

    let reader_handles: Vec<_> = (0..8)
        .map(|_| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                let _ = graph.has_path("user:0", "resource:shared");
                let _ = graph.list();
            })
        })
        .collect();

    for h in writer_handles {
        h.join().unwrap();
    }
    for h in reader_handles {
        h.join().unwrap();
    }

    for i in 0..8 {
        assert!(graph.has_path(&format!("user:{i}"), "resource:shared"));
    }
}
