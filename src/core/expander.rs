use crate::domain::model::{RouteJob, RouteRequest};

/// 把 one-way / roundtrip / multi-city 任務展開成單一路線請求
///
/// Order is load-bearing: for each job, the outbound leg, then the return
/// leg (only when all three `*_return` fields are set), then each stop in
/// list order. The final report follows this order.
pub fn expand(jobs: &[RouteJob]) -> Vec<RouteRequest> {
    let mut out = Vec::new();

    for job in jobs {
        out.push(RouteRequest::new(&job.origin, &job.target, &job.depart));

        if let (Some(origin), Some(target), Some(depart)) =
            (&job.origin_return, &job.target_return, &job.depart_return)
        {
            out.push(RouteRequest::new(origin, target, depart));
        }

        for stop in job.stops.iter().flatten() {
            out.push(RouteRequest::new(&stop.origin, &stop.target, &stop.depart));
        }
    }

    out
}
