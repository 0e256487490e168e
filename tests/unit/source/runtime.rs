use super::*;

#[test]
fn stop_cancels_the_shared_token() {
    let rt = FeedRuntime::start().unwrap();
    let token = rt.cancel_token();
    assert!(!token.is_cancelled());
    rt.stop();
    assert!(token.is_cancelled());
}

#[test]
fn dropping_the_runtime_also_cancels() {
    let token = {
        let rt = FeedRuntime::start().unwrap();
        rt.cancel_token()
    };
    assert!(token.is_cancelled());
}
