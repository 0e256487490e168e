use super::*;

#[test]
fn dequeues_in_arrival_order() {
    let mut q = ItemQueue::new();
    assert!(q.is_empty());
    q.push(QueuedItem::new("first".to_owned(), 50.0));
    q.push(QueuedItem::new("second".to_owned(), 60.0));
    assert_eq!(q.len(), 2);
    assert_eq!(q.peek_head().map(QueuedItem::text), Some("first"));

    assert_eq!(q.dequeue_head().unwrap().text(), "first");
    assert_eq!(q.dequeue_head().unwrap().width(), 60.0);
    assert!(q.dequeue_head().is_none());
    assert!(q.is_empty());
}
